//! Naming convention utilities for Java source generation.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `com.x.Orders` | [`split_identifier`] | (`com.x`, `Orders`) |
//! | `word` | [`capitalize`] | `Word` |
//! | `return` | [`java_identifier`] | `_return` |
//! | `in-progress` | [`constant_name`] | `IN_PROGRESS` |
//! | `a "b"` | [`string_literal`] | `"a \"b\""` |

/// Java keywords and literals that cannot be used as identifiers.
const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// Split a qualified class name into package and simple name.
///
/// The package is empty for a class in the default package.
pub fn split_identifier(identifier: &str) -> (&str, &str) {
    match identifier.rsplit_once('.') {
        Some((package, simple)) => (package, simple),
        None => ("", identifier),
    }
}

/// Simple class name of a qualified class name.
pub fn simple_name(identifier: &str) -> &str {
    split_identifier(identifier).1
}

/// Capitalize the first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Turn a property or parameter name into a legal Java identifier.
///
/// Characters outside `[A-Za-z0-9_$]` become `_`; keywords and names that
/// start with a digit get a leading `_`.
pub fn java_identifier(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let starts_with_digit = cleaned.chars().next().is_some_and(|c| c.is_ascii_digit());
    if cleaned.is_empty() || starts_with_digit || RESERVED.contains(&cleaned.as_str()) {
        format!("_{cleaned}")
    } else {
        cleaned
    }
}

/// Enum constant name for a lexical enum value.
pub fn constant_name(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_lower = false;
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && previous_lower {
                result.push('_');
            }
            previous_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            result.push(c.to_ascii_uppercase());
        } else {
            if !result.ends_with('_') {
                result.push('_');
            }
            previous_lower = false;
        }
    }
    java_identifier(&result)
}

/// Quote a string as a Java string literal.
pub fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

/// Boxed wrapper and unboxing method of a Java primitive type.
pub fn boxed_primitive(java_type: &str) -> Option<(&'static str, &'static str)> {
    let boxed = match java_type {
        "boolean" => ("Boolean", "booleanValue"),
        "byte" => ("Byte", "byteValue"),
        "short" => ("Short", "shortValue"),
        "int" => ("Integer", "intValue"),
        "long" => ("Long", "longValue"),
        "float" => ("Float", "floatValue"),
        "double" => ("Double", "doubleValue"),
        "char" => ("Character", "charValue"),
        _ => return None,
    };
    Some(boxed)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use test_case::test_case;

    #[test]
    fn split_identifier___qualified___splits_on_last_dot() {
        assert_eq!(split_identifier("com.x.jaxws.Place"), ("com.x.jaxws", "Place"));
    }

    #[test]
    fn split_identifier___default_package___has_empty_package() {
        assert_eq!(split_identifier("Orders"), ("", "Orders"));
    }

    #[test]
    fn capitalize___capitalizes_first_letter() {
        assert_eq!(capitalize("orderId"), "OrderId");
        assert_eq!(capitalize("a"), "A");
        assert_eq!(capitalize(""), "");
    }

    #[test_case("orderId", "orderId" ; "plain name")]
    #[test_case("return", "_return" ; "keyword")]
    #[test_case("order-id", "order_id" ; "dash")]
    #[test_case("1st", "_1st" ; "leading digit")]
    #[test_case("", "_" ; "empty")]
    fn java_identifier___sanitizes(input: &str, expected: &str) {
        assert_eq!(java_identifier(input), expected);
    }

    #[test_case("OPEN", "OPEN" ; "already constant")]
    #[test_case("in-progress", "IN_PROGRESS" ; "kebab")]
    #[test_case("inProgress", "IN_PROGRESS" ; "camel")]
    #[test_case("2xl", "_2XL" ; "leading digit")]
    #[test_case("a b", "A_B" ; "space")]
    fn constant_name___derives_constant(input: &str, expected: &str) {
        assert_eq!(constant_name(input), expected);
    }

    #[test]
    fn string_literal___escapes_quotes_and_backslashes() {
        assert_eq!(string_literal(r#"a "b" \c"#), r#""a \"b\" \\c""#);
        assert_eq!(string_literal("urn:orders"), "\"urn:orders\"");
    }

    #[test]
    fn boxed_primitive___maps_primitives_only() {
        assert_eq!(boxed_primitive("int"), Some(("Integer", "intValue")));
        assert_eq!(boxed_primitive("boolean"), Some(("Boolean", "booleanValue")));
        assert_eq!(boxed_primitive("String"), None);
        assert_eq!(boxed_primitive("int[]"), None);
    }
}

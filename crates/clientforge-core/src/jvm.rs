//! JVM type mappings for schema primitives.
//!
//! # Type Mappings
//!
//! | Schema | Primitive form | Boxed form |
//! |--------|----------------|------------|
//! | `string` | `String` | `String` |
//! | `boolean` | `boolean` | `Boolean` |
//! | `int` | `int` | `Integer` |
//! | `long` | `long` | `Long` |
//! | `double` | `double` | `Double` |
//! | `decimal` | `java.math.BigDecimal` | `java.math.BigDecimal` |
//! | `dateTime` | `java.util.Calendar` | `java.util.Calendar` |
//! | `base64Binary` | `byte[]` | `byte[]` |

use crate::model::Primitive;

/// Represents a JVM type with both primitive and boxed forms.
#[derive(Debug, Clone, PartialEq)]
pub struct JvmType {
    /// The primitive type name (e.g., "int", "boolean") or reference type name.
    pub primitive: String,
    /// The boxed type name (e.g., "Integer", "Boolean").
    pub boxed: String,
    /// Whether this type is a primitive.
    pub is_primitive: bool,
}

impl JvmType {
    /// Create a new JVM type with the same primitive and boxed form.
    pub fn reference(name: &str) -> Self {
        Self {
            primitive: name.to_string(),
            boxed: name.to_string(),
            is_primitive: false,
        }
    }

    /// Create a new JVM primitive type.
    pub fn primitive(primitive: &str, boxed: &str) -> Self {
        Self {
            primitive: primitive.to_string(),
            boxed: boxed.to_string(),
            is_primitive: true,
        }
    }
}

/// Map a schema primitive to a JVM type.
pub fn map_primitive(primitive: Primitive) -> JvmType {
    match primitive {
        Primitive::String => JvmType::reference("String"),
        Primitive::Boolean => JvmType::primitive("boolean", "Boolean"),
        Primitive::Byte => JvmType::primitive("byte", "Byte"),
        Primitive::Short => JvmType::primitive("short", "Short"),
        Primitive::Int => JvmType::primitive("int", "Integer"),
        Primitive::Long => JvmType::primitive("long", "Long"),
        Primitive::Float => JvmType::primitive("float", "Float"),
        Primitive::Double => JvmType::primitive("double", "Double"),
        Primitive::Decimal => JvmType::reference("java.math.BigDecimal"),
        Primitive::Integer => JvmType::reference("java.math.BigInteger"),
        Primitive::DateTime => JvmType::reference("java.util.Calendar"),
        Primitive::Base64Binary => JvmType::reference("byte[]"),
        Primitive::Qname => JvmType::reference("javax.xml.namespace.QName"),
        Primitive::AnyUri => JvmType::reference("java.net.URI"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use test_case::test_case;

    #[test_case(Primitive::Boolean, "boolean", "Boolean")]
    #[test_case(Primitive::Int, "int", "Integer")]
    #[test_case(Primitive::Long, "long", "Long")]
    #[test_case(Primitive::Double, "double", "Double")]
    #[test_case(Primitive::Byte, "byte", "Byte")]
    fn map_primitive___numeric___has_boxed_form(p: Primitive, primitive: &str, boxed: &str) {
        let ty = map_primitive(p);

        assert!(ty.is_primitive);
        assert_eq!(ty.primitive, primitive);
        assert_eq!(ty.boxed, boxed);
    }

    #[test_case(Primitive::String, "String")]
    #[test_case(Primitive::Decimal, "java.math.BigDecimal")]
    #[test_case(Primitive::DateTime, "java.util.Calendar")]
    #[test_case(Primitive::Base64Binary, "byte[]")]
    fn map_primitive___reference___same_in_both_forms(p: Primitive, name: &str) {
        let ty = map_primitive(p);

        assert!(!ty.is_primitive);
        assert_eq!(ty.primitive, name);
        assert_eq!(ty.boxed, name);
    }
}

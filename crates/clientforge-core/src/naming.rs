//! Name resolution from declared model names to target identifiers.
//!
//! Declared names are fully qualified (`com.example.api.Order`). Package
//! conversion rules rewrite the package portion only; the simple name is never
//! altered.
//!
//! # Matching
//!
//! A rule matches when its `from` is a prefix of the package at a segment
//! boundary, so `org.acme` matches `org.acme` and `org.acme.api` but not
//! `org.acmex`. The longest matching rule wins and only the matched prefix is
//! replaced.
//!
//! # Idempotence
//!
//! No rule's `from` may overlap any rule's `to` at a segment boundary (equal,
//! above or below it), except for an identity rule. Converted output then never
//! matches a rule again, so resolving an identifier twice is a no-op without
//! guessing which names were already converted.

use crate::config::PackageConversionRule;
use crate::error::{ConfigError, ModelIntegrityError};
use crate::jvm::map_primitive;
use crate::model::{Declared, TypeRef};
use crate::variant::Variant;

/// Resolves declared names to target identifiers under a fixed rule set.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    rules: Vec<PackageConversionRule>,
}

impl NameResolver {
    /// Create a resolver, validating the rule set.
    pub fn new(rules: Vec<PackageConversionRule>) -> Result<Self, ConfigError> {
        let mut unique: Vec<PackageConversionRule> = Vec::with_capacity(rules.len());
        for rule in rules {
            validate_rule(&rule)?;
            if let Some(existing) = unique.iter().find(|existing| existing.from == rule.from) {
                if existing.to != rule.to {
                    return Err(ConfigError::InvalidConversion {
                        reason: format!(
                            "'{}' is already converted to '{}'",
                            existing.from, existing.to
                        ),
                        from: rule.from,
                        to: rule.to,
                    });
                }
                continue;
            }
            unique.push(rule);
        }

        for rule in &unique {
            for other in &unique {
                let identity = rule.from == other.from && rule.from == rule.to;
                if !identity && segments_overlap(&rule.from, &other.to) {
                    return Err(ConfigError::ChainedConversion {
                        from: rule.from.clone(),
                        chained_from: other.from.clone(),
                        chained_to: other.to.clone(),
                    });
                }
            }
        }

        Ok(Self { rules: unique })
    }

    /// The active rules.
    pub fn rules(&self) -> &[PackageConversionRule] {
        &self.rules
    }

    /// Resolve a fully qualified name.
    pub fn resolve(&self, qualified_name: &str) -> Result<String, ModelIntegrityError> {
        check_name(qualified_name)?;
        match qualified_name.rsplit_once('.') {
            Some((package, simple_name)) => {
                Ok(format!("{}.{}", self.resolve_package(package), simple_name))
            }
            None => Ok(qualified_name.to_string()),
        }
    }

    /// Resolve a package name.
    pub fn resolve_package(&self, package: &str) -> String {
        let best_from = self
            .rules
            .iter()
            .filter(|rule| is_segment_prefix(&rule.from, package))
            .max_by_key(|rule| rule.from.len());

        match best_from {
            Some(rule) => format!("{}{}", rule.to, &package[rule.from.len()..]),
            None => package.to_string(),
        }
    }

    /// Resolve the declared name of a model entity.
    pub fn resolve_entity(&self, entity: &impl Declared) -> Result<String, ModelIntegrityError> {
        let name = entity
            .declared_name()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ModelIntegrityError::MissingQualifiedName {
                entity: entity.describe(),
            })?;
        self.resolve(name)
    }

    /// Resolve the element type of a repeated member.
    ///
    /// Legacy yields the plain element type; modern yields the element type in
    /// the boxed form usable as a generic type argument.
    pub fn resolve_component_type(
        &self,
        type_ref: &TypeRef,
        variant: Variant,
    ) -> Result<String, ModelIntegrityError> {
        match type_ref {
            TypeRef::Primitive(primitive) => {
                let jvm = map_primitive(*primitive);
                Ok(if variant.supports_generics() {
                    jvm.boxed
                } else {
                    jvm.primitive
                })
            }
            TypeRef::Named(name) => self.resolve(name),
        }
    }

    /// Resolve the full Java type of a member or parameter.
    ///
    /// Repeated values become arrays in the legacy variant and
    /// `java.util.List<T>` in the modern variant.
    pub fn resolve_value_type(
        &self,
        type_ref: &TypeRef,
        repeated: bool,
        variant: Variant,
    ) -> Result<String, ModelIntegrityError> {
        if !repeated {
            return self.resolve_component_type(type_ref, Variant::Legacy);
        }
        let component = self.resolve_component_type(type_ref, variant)?;
        Ok(if variant.supports_generics() {
            format!("java.util.List<{component}>")
        } else {
            format!("{component}[]")
        })
    }
}

/// Check that `prefix` equals `name` or is followed by a `.` in `name`.
fn is_segment_prefix(prefix: &str, name: &str) -> bool {
    name == prefix || is_strict_segment_prefix(prefix, name)
}

fn is_strict_segment_prefix(prefix: &str, name: &str) -> bool {
    name.len() > prefix.len() && name.starts_with(prefix) && name.as_bytes()[prefix.len()] == b'.'
}

fn segments_overlap(a: &str, b: &str) -> bool {
    is_segment_prefix(a, b) || is_strict_segment_prefix(b, a)
}

fn check_name(name: &str) -> Result<(), ModelIntegrityError> {
    if name.is_empty() || name.split('.').any(str::is_empty) {
        return Err(ModelIntegrityError::MalformedName(name.to_string()));
    }
    Ok(())
}

fn validate_rule(rule: &PackageConversionRule) -> Result<(), ConfigError> {
    for (label, value) in [("from", &rule.from), ("to", &rule.to)] {
        if value.is_empty() || value.split('.').any(str::is_empty) {
            return Err(ConfigError::InvalidConversion {
                from: rule.from.clone(),
                to: rule.to.clone(),
                reason: format!("'{label}' must be a dotted package name"),
            });
        }
    }
    Ok(())
}

//! Target runtime variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Java runtime flavors that client stubs are generated for.
///
/// Both variants share the same public names and binding metadata; they differ
/// only in emitted idiom (constant classes and arrays for legacy, enums and
/// generic collections for modern).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Pre-generics Java (1.4 source level).
    Legacy,
    /// Java 5 and later.
    Modern,
}

impl Variant {
    /// All variants, in generation order.
    #[must_use]
    pub fn all() -> &'static [Variant] {
        &[Variant::Legacy, Variant::Modern]
    }

    /// Get the variant key string (e.g., "legacy").
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Modern => "modern",
        }
    }

    /// Parse a variant from its string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "legacy" => Some(Self::Legacy),
            "modern" => Some(Self::Modern),
            _ => None,
        }
    }

    /// Whether this variant can use generic containers.
    #[must_use]
    pub fn supports_generics(&self) -> bool {
        matches!(self, Self::Modern)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

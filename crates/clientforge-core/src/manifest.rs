//! Ordered, deduplicated list of generated type identifiers.

use crate::error::ModelIntegrityError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// What produced a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// A synthesized request or response bean.
    Bean,
    /// A synthesized carrier bean for an implicit fault.
    FaultBean,
    /// A schema type definition.
    Type,
}

impl fmt::Display for EntryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryOrigin::Bean => write!(f, "a generated bean"),
            EntryOrigin::FaultBean => write!(f, "a generated fault bean"),
            EntryOrigin::Type => write!(f, "a type definition"),
        }
    }
}

/// Append-only manifest being built during the Common phase.
#[derive(Debug, Clone, Default)]
pub struct TypeManifest {
    identifiers: Vec<String>,
    origins: HashMap<String, EntryOrigin>,
}

impl TypeManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an identifier.
    ///
    /// Returns `Ok(false)` when the identifier is already present from the same
    /// origin (nothing is appended), and an error when a different origin
    /// already claimed it.
    pub fn append(
        &mut self,
        identifier: &str,
        origin: EntryOrigin,
    ) -> Result<bool, ModelIntegrityError> {
        match self.origins.get(identifier) {
            Some(existing) if *existing == origin => Ok(false),
            Some(existing) => Err(ModelIntegrityError::IdentifierCollision {
                identifier: identifier.to_string(),
                first: existing.to_string(),
                second: origin.to_string(),
            }),
            None => {
                self.origins.insert(identifier.to_string(), origin);
                self.identifiers.push(identifier.to_string());
                Ok(true)
            }
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.origins.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Stop accepting entries.
    pub fn freeze(self) -> FrozenManifest {
        FrozenManifest {
            identifiers: self.identifiers,
        }
    }
}

/// Read-only manifest produced by a completed Common phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrozenManifest {
    identifiers: Vec<String>,
}

impl FrozenManifest {
    /// Rebuild a manifest from persisted identifiers.
    ///
    /// Fails on the first duplicate.
    pub fn from_identifiers(
        identifiers: impl IntoIterator<Item = String>,
    ) -> Result<Self, ModelIntegrityError> {
        let mut manifest = TypeManifest::new();
        for identifier in identifiers {
            if !manifest.append(&identifier, EntryOrigin::Type)? {
                return Err(ModelIntegrityError::IdentifierCollision {
                    first: "an earlier entry".to_string(),
                    second: "a later entry".to_string(),
                    identifier,
                });
            }
        }
        Ok(manifest.freeze())
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|id| id == identifier)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

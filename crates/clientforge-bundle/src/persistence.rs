//! Type manifest and binding metadata persistence.
//!
//! # Files
//!
//! `<run-id>.types` lists the generated class names, one per line, each line
//! terminated by `\n`. An empty manifest is an empty file.
//!
//! `<run-id>.bindings.json` holds the binding registry:
//!
//! ```json
//! {
//!   "format_version": "1.0",
//!   "run_id": "build-42",
//!   "variant": "legacy",
//!   "entries": [
//!     { "key": "com.x.jaxws.Place",
//!       "descriptor": { "kind": "wrapper", "role": "request",
//!                       "element_name": "place", "namespace": "urn:orders",
//!                       "property_order": ["item", "quantity"] } }
//!   ]
//! }
//! ```
//!
//! Entries are sorted by key, then by descriptor kind.

use crate::{
    BINDINGS_FORMAT_VERSION, BINDINGS_SUFFIX, PersistenceError, PersistenceResult, TYPES_SUFFIX,
};
use clientforge_core::registry::Descriptor;
use clientforge_core::{FrozenManifest, FrozenRegistry, RunId, Variant};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Serialized form of the binding registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingsDocument {
    pub format_version: String,
    pub run_id: String,
    pub variant: Variant,
    pub entries: Vec<BindingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingEntry {
    pub key: String,
    pub descriptor: Descriptor,
}

impl BindingsDocument {
    /// Build the document for a frozen registry.
    pub fn from_registry(registry: &FrozenRegistry, run_id: &RunId, variant: Variant) -> Self {
        Self {
            format_version: BINDINGS_FORMAT_VERSION.to_string(),
            run_id: run_id.to_string(),
            variant,
            entries: registry
                .entries()
                .map(|(key, descriptor)| BindingEntry {
                    key: key.to_string(),
                    descriptor: descriptor.clone(),
                })
                .collect(),
        }
    }

    /// Rebuild the registry the document was written from.
    pub fn into_registry(self) -> PersistenceResult<FrozenRegistry> {
        FrozenRegistry::from_entries(
            self.entries
                .into_iter()
                .map(|entry| (entry.key, entry.descriptor)),
        )
        .map_err(|(key, kind)| {
            PersistenceError::malformed(
                "binding metadata",
                format!("duplicate {kind} descriptor for '{key}'"),
            )
        })
    }
}

/// Binding metadata read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBindings {
    pub run_id: String,
    pub variant: Variant,
    pub registry: FrozenRegistry,
}

/// Paths and digests of persisted metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifacts {
    pub manifest_path: PathBuf,
    pub manifest_sha256: String,
    pub bindings_path: PathBuf,
    pub bindings_sha256: String,
}

/// Writes the metadata of one compiled variant.
#[derive(Debug, Clone)]
pub struct MetadataPersistence {
    destination: PathBuf,
    run_id: RunId,
}

impl MetadataPersistence {
    pub fn new(destination: impl Into<PathBuf>, run_id: RunId) -> Self {
        Self {
            destination: destination.into(),
            run_id,
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Path of the type manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.destination
            .join(format!("{}{TYPES_SUFFIX}", self.run_id))
    }

    /// Path of the binding metadata file.
    pub fn bindings_path(&self) -> PathBuf {
        self.destination
            .join(format!("{}{BINDINGS_SUFFIX}", self.run_id))
    }

    /// Write both metadata files.
    ///
    /// The manifest is written first. If the bindings write fails, the
    /// manifest stays in place and the error is returned.
    pub fn persist(
        &self,
        manifest: &FrozenManifest,
        registry: &FrozenRegistry,
        variant: Variant,
    ) -> PersistenceResult<PersistedArtifacts> {
        fs::create_dir_all(&self.destination)?;

        let manifest_bytes = encode_manifest(manifest);
        let manifest_path = self.manifest_path();
        write_atomic(&manifest_path, &manifest_bytes)?;
        tracing::info!(
            path = %manifest_path.display(),
            types = manifest.len(),
            "wrote client type list"
        );

        let document = BindingsDocument::from_registry(registry, &self.run_id, variant);
        let bindings_bytes = serde_json::to_vec_pretty(&document)?;
        let bindings_path = self.bindings_path();
        write_atomic(&bindings_path, &bindings_bytes)?;
        tracing::info!(
            path = %bindings_path.display(),
            entries = document.entries.len(),
            "wrote binding metadata"
        );

        Ok(PersistedArtifacts {
            manifest_path,
            manifest_sha256: compute_sha256(&manifest_bytes),
            bindings_path,
            bindings_sha256: compute_sha256(&bindings_bytes),
        })
    }
}

/// Encode a manifest as newline-terminated lines.
pub fn encode_manifest(manifest: &FrozenManifest) -> Vec<u8> {
    let mut out = String::new();
    for identifier in manifest.iter() {
        out.push_str(identifier);
        out.push('\n');
    }
    out.into_bytes()
}

/// Parse manifest text.
pub fn parse_manifest(content: &str, artifact: &str) -> PersistenceResult<FrozenManifest> {
    let mut identifiers = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let identifier = line.trim();
        if identifier.is_empty() {
            return Err(PersistenceError::malformed(
                artifact,
                format!("empty identifier on line {}", index + 1),
            ));
        }
        identifiers.push(identifier.to_string());
    }
    FrozenManifest::from_identifiers(identifiers)
        .map_err(|err| PersistenceError::malformed(artifact, err.to_string()))
}

/// Parse a binding metadata document.
pub fn parse_bindings(bytes: &[u8], artifact: &str) -> PersistenceResult<LoadedBindings> {
    let document: BindingsDocument = serde_json::from_slice(bytes)?;
    if document.format_version != BINDINGS_FORMAT_VERSION {
        return Err(PersistenceError::malformed(
            artifact,
            format!(
                "unsupported format version '{}' (expected '{BINDINGS_FORMAT_VERSION}')",
                document.format_version
            ),
        ));
    }
    let run_id = document.run_id.clone();
    let variant = document.variant;
    Ok(LoadedBindings {
        run_id,
        variant,
        registry: document.into_registry()?,
    })
}

/// Read a type manifest file.
pub fn load_manifest(path: impl AsRef<Path>) -> PersistenceResult<FrozenManifest> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    parse_manifest(&content, &path.display().to_string())
}

/// Read a binding metadata file.
pub fn load_bindings(path: impl AsRef<Path>) -> PersistenceResult<LoadedBindings> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    parse_bindings(&bytes, &path.display().to_string())
}

/// Write `contents` to `path` through a temporary file in the same directory.
pub fn write_atomic(path: &Path, contents: &[u8]) -> PersistenceResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Compute SHA256 hash of data and return as hex string.
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "persistence/persistence_tests.rs"]
mod persistence_tests;

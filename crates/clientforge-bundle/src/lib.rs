//! Binding metadata persistence and archive packaging for clientforge
//!
//! This crate writes what a compiled client variant needs at runtime: the type
//! manifest, the binding metadata record and the packaged `.jar` archives.
//!
//! # Compile Directory Layout
//!
//! ```text
//! build/legacy/classes/
//! ├── <run-id>.types            # one generated class name per line
//! ├── <run-id>.bindings.json    # binding metadata record
//! └── com/example/client/...    # compiled classes
//! ```
//!
//! Both metadata files are written atomically: a reader sees either the
//! previous file or the complete new one.
//!
//! # Example
//!
//! ```no_run
//! use clientforge_bundle::MetadataPersistence;
//! use clientforge_core::{BindingRegistry, RunId, TypeManifest, Variant};
//!
//! let run_id = RunId::parse("build-42").unwrap();
//! let persistence = MetadataPersistence::new("build/legacy/classes", run_id);
//! let artifacts = persistence.persist(
//!     &TypeManifest::new().freeze(),
//!     &BindingRegistry::new().freeze(),
//!     Variant::Legacy,
//! )?;
//! println!("wrote {}", artifacts.bindings_path.display());
//! # Ok::<(), clientforge_bundle::PersistenceError>(())
//! ```

mod error;

pub mod builder;
pub mod loader;
pub mod persistence;

pub use builder::ArchiveBuilder;
pub use error::PersistenceError;
pub use loader::ArchiveLoader;
pub use persistence::{
    BindingEntry, BindingsDocument, LoadedBindings, MetadataPersistence, PersistedArtifacts,
};

/// Result type for persistence and packaging operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Current binding metadata format version.
pub const BINDINGS_FORMAT_VERSION: &str = "1.0";

/// Suffix of the type manifest file.
pub const TYPES_SUFFIX: &str = ".types";

/// Suffix of the binding metadata file.
pub const BINDINGS_SUFFIX: &str = ".bindings.json";

/// Archive file extension.
pub const ARCHIVE_EXTENSION: &str = "jar";

/// Archive manifest entry.
pub const ARCHIVE_MANIFEST: &str = "META-INF/MANIFEST.MF";

//! Archive loading utilities.
//!
//! The [`ArchiveLoader`] reads entries and run metadata back out of a
//! packaged client archive.

use crate::persistence::{LoadedBindings, parse_bindings, parse_manifest};
use crate::{BINDINGS_SUFFIX, PersistenceError, PersistenceResult, TYPES_SUFFIX};
use clientforge_core::{FrozenManifest, RunId};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Loader for packaged client archives.
#[derive(Debug)]
pub struct ArchiveLoader {
    archive: ZipArchive<File>,
    path: PathBuf,
}

impl ArchiveLoader {
    /// Open an archive for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let archive = ZipArchive::new(file)?;

        Ok(Self {
            archive,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List all entries in the archive.
    #[must_use]
    pub fn entry_names(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i).map(String::from))
            .collect()
    }

    #[must_use]
    pub fn has_entry(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read an entry as bytes.
    pub fn read(&mut self, name: &str) -> PersistenceResult<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|_| PersistenceError::MissingEntry(name.to_string()))?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Read the type manifest a run stored at the archive root.
    pub fn load_manifest(&mut self, run_id: &RunId) -> PersistenceResult<FrozenManifest> {
        let name = format!("{run_id}{TYPES_SUFFIX}");
        let bytes = self.read(&name)?;
        let content = String::from_utf8(bytes)
            .map_err(|err| PersistenceError::malformed(&name, err.to_string()))?;
        parse_manifest(&content, &name)
    }

    /// Read the binding metadata a run stored at the archive root.
    pub fn load_bindings(&mut self, run_id: &RunId) -> PersistenceResult<LoadedBindings> {
        let name = format!("{run_id}{BINDINGS_SUFFIX}");
        let bytes = self.read(&name)?;
        parse_bindings(&bytes, &name)
    }
}

//! Archive creation utilities.
//!
//! The [`ArchiveBuilder`] provides a fluent API for packaging a compile
//! directory or a source directory as a `.jar` archive.

use crate::persistence::compute_sha256;
use crate::{ARCHIVE_MANIFEST, PersistenceError, PersistenceResult};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Manifest written when no entry replaces it.
pub const DEFAULT_ARCHIVE_MANIFEST: &str = "Manifest-Version: 1.0\nCreated-By: clientforge\n";

/// Builder for `.jar` archives.
///
/// Entries are written in path order after the archive manifest. Adding the
/// same archive path twice keeps the last contents.
///
/// # Example
///
/// ```no_run
/// use clientforge_bundle::ArchiveBuilder;
///
/// let digest = ArchiveBuilder::new()
///     .add_directory("build/legacy/classes")?
///     .write("build/orders-client-legacy.jar")?;
/// println!("sha256 {digest}");
/// # Ok::<(), clientforge_bundle::PersistenceError>(())
/// ```
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: BTreeMap<String, Vec<u8>>,
}

impl ArchiveBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every file below `root`, named by its path relative to `root`.
    pub fn add_directory<P: AsRef<Path>>(mut self, root: P) -> PersistenceResult<Self> {
        let root = root.as_ref();
        let mut files = Vec::new();
        collect_files(root, &mut files)?;

        for file in files {
            let relative = file.strip_prefix(root).map_err(|_| {
                PersistenceError::malformed(
                    root.display(),
                    format!("{} is outside the archive root", file.display()),
                )
            })?;
            let archive_path = archive_path(relative);
            let contents = fs::read(&file)?;
            self.entries.insert(archive_path, contents);
        }

        Ok(self)
    }

    /// Add a single file under the given archive path.
    pub fn add_file<P: AsRef<Path>>(
        mut self,
        source_path: P,
        archive_path: &str,
    ) -> PersistenceResult<Self> {
        let contents = fs::read(source_path.as_ref())?;
        self.entries.insert(archive_path.to_string(), contents);
        Ok(self)
    }

    /// Add raw bytes as a file in the archive.
    pub fn add_bytes(mut self, archive_path: &str, contents: Vec<u8>) -> Self {
        self.entries.insert(archive_path.to_string(), contents);
        self
    }

    /// Number of entries, excluding the archive manifest.
    pub fn len(&self) -> usize {
        self.entries
            .keys()
            .filter(|path| path.as_str() != ARCHIVE_MANIFEST)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the archive and return its SHA256 digest.
    ///
    /// The archive is assembled in a temporary file next to `output_path`
    /// and renamed into place once complete.
    pub fn write<P: AsRef<Path>>(mut self, output_path: P) -> PersistenceResult<String> {
        let output_path = output_path.as_ref();
        let dir = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let manifest = self
            .entries
            .remove(ARCHIVE_MANIFEST)
            .unwrap_or_else(|| DEFAULT_ARCHIVE_MANIFEST.as_bytes().to_vec());

        let mut zip = ZipWriter::new(NamedTempFile::new_in(dir)?);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file(ARCHIVE_MANIFEST, options)?;
        zip.write_all(&manifest)?;

        for (path, contents) in &self.entries {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(contents)?;
        }

        let temp = zip.finish()?;
        temp.as_file().sync_all()?;
        temp.persist(output_path).map_err(|err| err.error)?;

        let digest = compute_sha256(&fs::read(output_path)?);
        tracing::info!(
            path = %output_path.display(),
            entries = self.entries.len(),
            sha256 = %digest,
            "wrote archive"
        );
        Ok(digest)
    }
}

fn collect_files(dir: &Path, files: &mut Vec<std::path::PathBuf>) -> PersistenceResult<()> {
    let mut children: Vec<_> = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<_, _>>()?;
    children.sort();

    for child in children {
        if child.is_dir() {
            collect_files(&child, files)?;
        } else {
            files.push(child);
        }
    }
    Ok(())
}

fn archive_path(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

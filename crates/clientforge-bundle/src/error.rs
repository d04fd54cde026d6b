//! Error types for persistence and packaging.

use thiserror::Error;

/// Errors that can occur while writing or reading client artifacts.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A persisted artifact does not have the expected structure.
    #[error("Malformed {artifact}: {reason}")]
    Malformed { artifact: String, reason: String },

    /// Missing required entry in an archive.
    #[error("Missing required entry: {0}")]
    MissingEntry(String),
}

impl PersistenceError {
    pub(crate) fn malformed(artifact: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        PersistenceError::Malformed {
            artifact: artifact.to_string(),
            reason: reason.into(),
        }
    }
}

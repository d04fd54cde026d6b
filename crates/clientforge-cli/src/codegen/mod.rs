//! Java code generation
//!
//! [`JavaRenderer`] implements the core renderer interface and writes one
//! compilation unit per request into the source tree of its phase:
//!
//! ```text
//! <output>/common/src/com/x/jaxws/Place.java
//! <output>/legacy/src/com/x/Orders.java
//! <output>/modern/src/com/x/Orders.java
//! ```

pub mod java;
pub mod naming;

use clientforge_core::{Phase, RenderError, RenderRequest, Renderer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Renders requests into Java source files.
#[derive(Debug, Clone)]
pub struct JavaRenderer {
    output: PathBuf,
    write: bool,
}

impl JavaRenderer {
    /// Create a renderer writing under `output`.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            write: true,
        }
    }

    /// Create a renderer that generates sources without writing them.
    pub fn dry_run(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            write: false,
        }
    }

    /// Source root of a phase.
    pub fn source_root(&self, phase: Phase) -> PathBuf {
        source_root(&self.output, phase)
    }
}

/// Source root of a phase under an output directory.
pub fn source_root(output: &Path, phase: Phase) -> PathBuf {
    output.join(phase.as_str()).join("src")
}

impl Renderer for JavaRenderer {
    fn render(&self, phase: Phase, request: &RenderRequest) -> Result<PathBuf, RenderError> {
        let source = java::generate_java(request)?;
        let path = self.source_root(phase).join(source.relative_path());

        if self.write {
            let io_error = |err| RenderError::Io {
                path: path.display().to_string(),
                source: err,
            };
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
            fs::write(&path, source.code.as_bytes()).map_err(io_error)?;
        }

        trace!(
            phase = %phase,
            template = %request.template,
            path = %path.display(),
            "Rendered"
        );
        Ok(path)
    }
}

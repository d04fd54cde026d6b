//! Java compiler invocation

use clientforge_core::Variant;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

/// One variant's compilation.
#[derive(Debug, Clone)]
pub struct CompileJob {
    pub variant: Variant,
    pub sources: Vec<PathBuf>,
    pub classpath: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub args: Vec<String>,
}

/// Errors from compiling a variant's sources
#[derive(Error, Debug)]
pub enum CompileFailure {
    #[error("failed to start compiler '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("compiler exited with {status}:\n{stderr}")]
    Exit { status: String, stderr: String },

    #[error("invalid classpath entry: {0}")]
    Classpath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compiles a set of Java sources into a class directory.
pub trait SourceCompiler: Send + Sync {
    fn compile(&self, job: &CompileJob) -> Result<(), CompileFailure>;
}

/// Runs an external `javac`.
///
/// Source paths are passed through an `@argfile` so large models do not hit
/// command-line length limits.
#[derive(Debug, Clone)]
pub struct JavacCompiler {
    program: String,
}

impl JavacCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, job: &CompileJob, argfile: &Path) -> Result<Command, CompileFailure> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&job.args);
        cmd.arg("-d").arg(&job.output_dir);

        if !job.classpath.is_empty() {
            let classpath = std::env::join_paths(&job.classpath)
                .map_err(|e| CompileFailure::Classpath(e.to_string()))?;
            cmd.arg("-classpath").arg(classpath);
        }

        let mut argfile_arg = OsString::from("@");
        argfile_arg.push(argfile);
        cmd.arg(argfile_arg);
        Ok(cmd)
    }
}

/// Quote a path for a javac argument file.
fn argfile_line(path: &Path) -> String {
    let text = path.display().to_string().replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{text}\"\n")
}

impl SourceCompiler for JavacCompiler {
    fn compile(&self, job: &CompileJob) -> Result<(), CompileFailure> {
        fs::create_dir_all(&job.output_dir)?;

        let mut argfile = tempfile::NamedTempFile::new()?;
        for source in &job.sources {
            argfile.write_all(argfile_line(source).as_bytes())?;
        }
        argfile.flush()?;

        let mut cmd = self.command(job, argfile.path())?;
        debug!(variant = %job.variant, command = ?cmd, "Invoking compiler");

        let output = cmd.output().map_err(|source| CompileFailure::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(CompileFailure::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        info!(
            variant = %job.variant,
            sources = job.sources.len(),
            output = %job.output_dir.display(),
            "Compiled"
        );
        Ok(())
    }
}

/// Skips compilation, leaving only an empty class directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompiler;

impl SourceCompiler for NoopCompiler {
    fn compile(&self, job: &CompileJob) -> Result<(), CompileFailure> {
        fs::create_dir_all(&job.output_dir)?;
        debug!(variant = %job.variant, "Compilation skipped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use tempfile::TempDir;

    fn job(output_dir: PathBuf) -> CompileJob {
        CompileJob {
            variant: Variant::Legacy,
            sources: vec![PathBuf::from("src/com/x/Orders.java")],
            classpath: vec![],
            output_dir,
            args: vec!["-source".to_string(), "1.4".to_string()],
        }
    }

    #[test]
    fn argfile_line___quotes_and_escapes() {
        assert_eq!(argfile_line(Path::new("a b/C.java")), "\"a b/C.java\"\n");
        assert_eq!(argfile_line(Path::new("x\"y.java")), "\"x\\\"y.java\"\n");
    }

    #[test]
    fn JavacCompiler___command___passes_args_output_and_argfile() {
        let compiler = JavacCompiler::new("javac");
        let cmd = compiler
            .command(&job(PathBuf::from("out")), Path::new("sources.txt"))
            .unwrap();

        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(cmd.get_program(), "javac");
        assert_eq!(args, ["-source", "1.4", "-d", "out", "@sources.txt"]);
    }

    #[test]
    fn JavacCompiler___command___joins_classpath() {
        let compiler = JavacCompiler::new("javac");
        let mut job = job(PathBuf::from("out"));
        job.classpath = vec![PathBuf::from("a.jar"), PathBuf::from("b.jar")];

        let cmd = compiler.command(&job, Path::new("sources.txt")).unwrap();

        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let expected = std::env::join_paths(["a.jar", "b.jar"]).unwrap();
        assert_eq!(args[4], "-classpath");
        assert_eq!(args[5], expected.to_string_lossy());
    }

    #[test]
    fn JavacCompiler___missing_program___reports_spawn() {
        let temp = TempDir::new().unwrap();
        let compiler = JavacCompiler::new("clientforge-no-such-javac");

        let result = compiler.compile(&job(temp.path().join("classes")));

        assert!(matches!(result, Err(CompileFailure::Spawn { .. })));
    }

    #[test]
    fn NoopCompiler___creates_output_dir() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("legacy/classes");

        NoopCompiler.compile(&job(output.clone())).unwrap();

        assert!(output.is_dir());
    }
}

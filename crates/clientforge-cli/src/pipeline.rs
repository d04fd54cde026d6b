//! The `generate` pipeline: render, compile, persist and package.
//!
//! Generation failures abort the run. After generation, each variant is
//! compiled, persisted and packaged on its own thread; a failure in one
//! variant does not stop the other.

use crate::codegen::{JavaRenderer, source_root};
use crate::compile::{CompileFailure, CompileJob, SourceCompiler};
use anyhow::{Context, Result};
use clientforge_bundle::{ArchiveBuilder, MetadataPersistence, PersistedArtifacts, PersistenceError};
use clientforge_core::{
    ClientConfig, GenerationOrchestrator, NameResolver, Phase, RunId, RunOutput, ServiceModel,
    Variant,
};
use std::path::PathBuf;
use std::thread;
use thiserror::Error;
use tracing::{error, info};

/// Why a variant did not produce its archives.
#[derive(Error, Debug)]
pub enum VariantFailure {
    #[error("compilation failed: {0}")]
    Compile(#[from] CompileFailure),

    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("{0} worker panicked")]
    Panicked(Variant),
}

/// Archives and metadata of one successfully built variant.
#[derive(Debug, Clone)]
pub struct VariantArtifacts {
    pub variant: Variant,
    pub classes_dir: PathBuf,
    pub metadata: PersistedArtifacts,
    pub binary_archive: PathBuf,
    pub binary_sha256: String,
    pub source_archive: PathBuf,
    pub source_sha256: String,
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    pub run_id: RunId,
    pub output: RunOutput,
    pub variants: Vec<(Variant, Result<VariantArtifacts, VariantFailure>)>,
}

impl PipelineReport {
    pub fn failures(&self) -> impl Iterator<Item = (Variant, &VariantFailure)> {
        self.variants
            .iter()
            .filter_map(|(variant, result)| result.as_ref().err().map(|e| (*variant, e)))
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &VariantArtifacts> {
        self.variants
            .iter()
            .filter_map(|(_, result)| result.as_ref().ok())
    }
}

/// Drives a full compiler run over one model.
pub struct Pipeline<'a> {
    config: &'a ClientConfig,
    output: PathBuf,
    compiler: &'a dyn SourceCompiler,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a ClientConfig,
        output: impl Into<PathBuf>,
        compiler: &'a dyn SourceCompiler,
    ) -> Self {
        Self {
            config,
            output: output.into(),
            compiler,
        }
    }

    /// Classes directory of a variant.
    pub fn classes_dir(&self, variant: Variant) -> PathBuf {
        self.output.join(variant.as_str()).join("classes")
    }

    /// Path of a variant's archive, with an optional classifier.
    pub fn archive_path(&self, variant: Variant, classifier: Option<&str>) -> PathBuf {
        let name = match classifier {
            Some(classifier) => format!("{}-{variant}-{classifier}.jar", self.config.archive_name()),
            None => format!("{}-{variant}.jar", self.config.archive_name()),
        };
        self.output.join(name)
    }

    /// Generate sources, then build every variant.
    pub fn run(&self, model: &ServiceModel) -> Result<PipelineReport> {
        let rules = self
            .config
            .conversion_rules()
            .context("Invalid package conversions")?;
        let names = NameResolver::new(rules).context("Invalid package conversions")?;
        let run_id = self
            .config
            .resolve_run_id()
            .context("Invalid run identifier")?;

        info!(run_id = %run_id, output = %self.output.display(), "Starting client generation");

        let renderer = JavaRenderer::new(&self.output);
        let orchestrator =
            GenerationOrchestrator::new(model, names, self.config.endpoint_context());
        let output = orchestrator
            .run(&renderer)
            .context("Client source generation failed")?;

        let run_id_ref = &run_id;
        let output_ref = &output;
        let variants = thread::scope(|scope| {
            let handles: Vec<_> = Variant::all()
                .iter()
                .map(|&variant| {
                    let handle =
                        scope.spawn(move || self.build_variant(output_ref, run_id_ref, variant));
                    (variant, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(variant, handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|_| Err(VariantFailure::Panicked(variant)));
                    if let Err(err) = &result {
                        error!(variant = %variant, error = %err, "Variant build failed");
                    }
                    (variant, result)
                })
                .collect()
        });

        Ok(PipelineReport {
            run_id,
            output,
            variants,
        })
    }

    /// Compile, persist and package one variant.
    pub fn build_variant(
        &self,
        output: &RunOutput,
        run_id: &RunId,
        variant: Variant,
    ) -> Result<VariantArtifacts, VariantFailure> {
        let classes_dir = self.classes_dir(variant);
        let job = CompileJob {
            variant,
            sources: output
                .sources_for(variant)
                .into_iter()
                .map(|file| file.path.clone())
                .collect(),
            classpath: self.config.compile.classpath.clone(),
            output_dir: classes_dir.clone(),
            args: self.config.compile.args_for(variant).to_vec(),
        };
        self.compiler.compile(&job)?;

        let registry = match output.variant(variant) {
            Some(phase) => phase.registry.clone(),
            None => output.common.registry.clone(),
        };
        let metadata = MetadataPersistence::new(&classes_dir, run_id.clone()).persist(
            &output.common.manifest,
            &registry,
            variant,
        )?;

        let binary_archive = self.archive_path(variant, None);
        let binary_sha256 = ArchiveBuilder::new()
            .add_directory(&classes_dir)?
            .write(&binary_archive)?;

        let source_archive = self.archive_path(variant, Some("sources"));
        let mut sources = ArchiveBuilder::new();
        for phase in [Phase::Common, Phase::Variant(variant)] {
            let root = source_root(&self.output, phase);
            if root.is_dir() {
                sources = sources.add_directory(&root)?;
            }
        }
        let source_sha256 = sources.write(&source_archive)?;

        info!(
            variant = %variant,
            archive = %binary_archive.display(),
            sources = %source_archive.display(),
            "Variant packaged"
        );

        Ok(VariantArtifacts {
            variant,
            classes_dir,
            metadata,
            binary_archive,
            binary_sha256,
            source_archive,
            source_sha256,
        })
    }
}

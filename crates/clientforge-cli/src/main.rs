//! clientforge CLI - SOAP client stub compiler
//!
//! Commands:
//! - `clientforge generate` - Generate, compile and package both client variants
//! - `clientforge check` - Validate a configuration and model without writing
//! - `clientforge init` - Write a default clientforge.toml

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod check;
mod codegen;
mod compile;
mod init;
mod inputs;
mod logging;
mod pipeline;

use compile::{JavacCompiler, NoopCompiler, SourceCompiler};
use pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "clientforge")]
#[command(author, version, about = "Compile SOAP service models into Java client stubs", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate, compile and package the legacy and modern clients
    Generate {
        /// Path to the JSON service model
        #[arg(short, long)]
        model: PathBuf,

        /// Path to clientforge.toml (default: ./clientforge.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for sources, classes and archives
        #[arg(short, long, default_value = "build")]
        output: PathBuf,

        /// Skip the Java compiler and package sources and metadata only
        #[arg(long)]
        skip_compile: bool,
    },

    /// Validate a configuration and model without writing anything
    Check {
        /// Path to the JSON service model
        #[arg(short, long)]
        model: PathBuf,

        /// Path to clientforge.toml (default: ./clientforge.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a clientforge.toml holding the default settings
    Init {
        /// Destination of the configuration file
        #[arg(short, long, default_value = inputs::DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Project label
        #[arg(short, long)]
        label: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Generate {
            model,
            config,
            output,
            skip_compile,
        } => {
            generate(&model, config.as_deref(), output, skip_compile)?;
        }
        Commands::Check { model, config } => {
            check::run(&model, config.as_deref())?;
        }
        Commands::Init { path, label, force } => {
            init::run(&path, label, force)?;
        }
    }

    Ok(())
}

fn generate(
    model: &Path,
    config: Option<&Path>,
    output: PathBuf,
    skip_compile: bool,
) -> anyhow::Result<()> {
    let config = inputs::load_config(config)?;
    let model = inputs::load_model(model)?;

    let javac = JavacCompiler::new(config.compile.javac.clone());
    let compiler: &dyn SourceCompiler = if skip_compile { &NoopCompiler } else { &javac };

    let report = Pipeline::new(&config, output, compiler).run(&model)?;

    println!(
        "Run {} ({} types)",
        report.run_id,
        report.output.common.manifest.len()
    );
    for artifacts in report.succeeded() {
        println!("✓ {}", artifacts.variant);
        println!("  Classes:  {}", artifacts.classes_dir.display());
        println!("  Types:    {}", artifacts.metadata.manifest_path.display());
        println!("  Bindings: {}", artifacts.metadata.bindings_path.display());
        println!(
            "  Archive:  {} (sha256 {})",
            artifacts.binary_archive.display(),
            artifacts.binary_sha256
        );
        println!(
            "  Sources:  {} (sha256 {})",
            artifacts.source_archive.display(),
            artifacts.source_sha256
        );
    }

    let failures: Vec<_> = report.failures().collect();
    for (variant, failure) in &failures {
        eprintln!("✗ {variant}: {failure}");
    }
    if !failures.is_empty() {
        anyhow::bail!("{} of {} variants failed", failures.len(), report.variants.len());
    }

    Ok(())
}

//! Check command implementation

use crate::codegen::JavaRenderer;
use crate::inputs::{load_config, load_model};
use anyhow::{Context, Result};
use clientforge_core::{GenerationOrchestrator, NameResolver, RunOutput};
use std::path::Path;

/// Validate the configuration and model and dry-run generation.
pub fn run(model: &Path, config: Option<&Path>) -> Result<RunOutput> {
    let config = load_config(config)?;
    let model = load_model(model)?;

    let names = NameResolver::new(config.conversion_rules()?)
        .context("Invalid package conversions")?;
    let orchestrator = GenerationOrchestrator::new(&model, names, config.endpoint_context());
    let output = orchestrator
        .run(&JavaRenderer::dry_run("."))
        .context("Model does not generate")?;

    println!("✓ Model is valid");
    println!("  Label:    {}", config.label);
    println!("  Archive:  {}", config.archive_name());
    println!("  Types:    {}", output.common.manifest.len());
    println!("  Bindings: {}", output.common.registry.len());
    for phase in &output.variants {
        println!(
            "  {:<9} {} sources",
            format!("{}:", phase.variant),
            output.sources_for(phase.variant).len()
        );
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn run___empty_model___passes_without_output() {
        let temp = TempDir::new().unwrap();
        let model = temp.path().join("model.json");
        fs::write(&model, b"{}").unwrap();
        let config = temp.path().join("clientforge.toml");
        fs::write(&config, b"label = \"empty\"\n").unwrap();

        let output = run(&model, Some(&config)).unwrap();

        assert!(output.common.manifest.is_empty());
        assert!(!temp.path().join("common").exists());
    }
}

//! Init command implementation

use anyhow::{Context, Result};
use clientforge_core::ClientConfig;
use std::fs;
use std::path::Path;

/// Write a configuration file holding every default.
pub fn run(path: &Path, label: Option<String>, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut config = ClientConfig::default();
    if let Some(label) = label {
        config.label = label;
    }

    let content = toml::to_string_pretty(&config).context("Failed to encode configuration")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Wrote {}", path.display());
    Ok(())
}

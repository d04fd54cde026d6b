//! Loading the configuration and the service model

use anyhow::{Context, Result};
use clientforge_core::{ClientConfig, ServiceModel};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "clientforge.toml";

/// Load the run configuration.
///
/// Without an explicit path, `./clientforge.toml` is used when present and
/// the built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                return Ok(ClientConfig::default());
            }
            default
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = ClientConfig::from_toml(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    debug!(path = %path.display(), label = %config.label, "Loaded configuration");
    Ok(config)
}

/// Load a JSON service model.
pub fn load_model(path: &Path) -> Result<ServiceModel> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read model {}", path.display()))?;
    let model = ServiceModel::from_json(&bytes)
        .with_context(|| format!("Invalid service model in {}", path.display()))?;
    debug!(
        path = %path.display(),
        endpoints = model.all_endpoints().count(),
        types = model.all_types().count(),
        "Loaded service model"
    );
    Ok(model)
}

//! Compiler run configuration

use crate::error::ConfigError;
use crate::variant::Variant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for one compiler run, usually loaded from `clientforge.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Project label, used to derive the default archive name
    #[serde(default = "default_label")]
    pub label: String,

    #[serde(default)]
    pub client: ClientSection,

    #[serde(default)]
    pub deployment: DeploymentSection,

    #[serde(default)]
    pub compile: CompileSection,
}

/// The `[client]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSection {
    /// Base name of the packaged archives (default: `<label>-client`)
    #[serde(default)]
    pub archive_name: Option<String>,

    /// Identifier used to name per-run artifacts (default: time-ordered UUID)
    #[serde(default)]
    pub run_id: Option<String>,

    /// Package conversions, in declaration order
    #[serde(default)]
    pub package_conversions: Vec<PackageConversion>,
}

/// A `[[client.package_conversions]]` entry as written by the user.
///
/// Both attributes are optional at parse time so that a missing one is
/// reported as a [`ConfigError::MissingAttribute`] instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageConversion {
    #[serde(default)]
    pub from: Option<String>,

    #[serde(default)]
    pub to: Option<String>,
}

/// A validated package conversion rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageConversionRule {
    pub from: String,
    pub to: String,
}

impl PackageConversionRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// The `[deployment]` table: default endpoint address parts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentSection {
    #[serde(default)]
    pub protocol: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub context: Option<String>,
}

/// The `[compile]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileSection {
    /// Java compiler executable
    #[serde(default = "default_javac")]
    pub javac: String,

    #[serde(default)]
    pub classpath: Vec<PathBuf>,

    #[serde(default = "default_legacy_args")]
    pub legacy_args: Vec<String>,

    #[serde(default = "default_modern_args")]
    pub modern_args: Vec<String>,
}

fn default_label() -> String {
    "clientforge".to_string()
}

fn default_javac() -> String {
    "javac".to_string()
}

fn default_legacy_args() -> Vec<String> {
    vec!["-source".to_string(), "1.4".to_string(), "-g".to_string()]
}

fn default_modern_args() -> Vec<String> {
    vec!["-g".to_string()]
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            client: ClientSection::default(),
            deployment: DeploymentSection::default(),
            compile: CompileSection::default(),
        }
    }
}

impl Default for CompileSection {
    fn default() -> Self {
        Self {
            javac: default_javac(),
            classpath: Vec::new(),
            legacy_args: default_legacy_args(),
            modern_args: default_modern_args(),
        }
    }
}

impl CompileSection {
    /// Extra compiler arguments for a variant
    pub fn args_for(&self, variant: Variant) -> &[String] {
        match variant {
            Variant::Legacy => &self.legacy_args,
            Variant::Modern => &self.modern_args,
        }
    }
}

impl ClientConfig {
    /// Parse and validate a TOML configuration document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every attribute that can be checked without running the compiler
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.conversion_rules()?;
        if let Some(run_id) = &self.client.run_id {
            RunId::parse(run_id)?;
        }
        Ok(())
    }

    /// Archive base name, defaulting to `<label>-client`
    pub fn archive_name(&self) -> String {
        self.client
            .archive_name
            .clone()
            .unwrap_or_else(|| format!("{}-client", self.label))
    }

    /// Validated conversion rules, in declaration order
    pub fn conversion_rules(&self) -> Result<Vec<PackageConversionRule>, ConfigError> {
        self.client
            .package_conversions
            .iter()
            .map(|conversion| {
                let from = conversion
                    .from
                    .clone()
                    .ok_or(ConfigError::MissingAttribute {
                        element: "package-conversion",
                        attribute: "from",
                    })?;
                let to = conversion.to.clone().ok_or(ConfigError::MissingAttribute {
                    element: "package-conversion",
                    attribute: "to",
                })?;
                Ok(PackageConversionRule { from, to })
            })
            .collect()
    }

    /// The configured run id, or a freshly generated one.
    ///
    /// Call once per run: each call without a configured id yields a new id.
    pub fn resolve_run_id(&self) -> Result<RunId, ConfigError> {
        match &self.client.run_id {
            Some(id) => RunId::parse(id),
            None => Ok(RunId::generate()),
        }
    }

    /// Default endpoint address parts with the context path normalized
    pub fn endpoint_context(&self) -> EndpointContext {
        EndpointContext::new(
            self.deployment.protocol.as_deref().unwrap_or("http"),
            self.deployment.host.as_deref().unwrap_or("localhost"),
            self.deployment.context.as_deref().unwrap_or(""),
        )
    }
}

/// Identifier of one compiler run, used to name per-run artifacts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunId(String);

impl RunId {
    /// Validate a caller-supplied run id
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let valid = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            && value != "."
            && value != "..";
        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(ConfigError::InvalidRunId(value.to_string()))
        }
    }

    /// Generate a time-ordered run id
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RunId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RunId::parse(&value)
    }
}

impl From<RunId> for String {
    fn from(id: RunId) -> Self {
        id.0
    }
}

/// Protocol, host and context path of the default endpoint address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointContext {
    pub protocol: String,
    pub host: String,
    /// Context path without a leading slash and, when non-empty, with exactly
    /// one trailing slash
    pub context: String,
}

impl EndpointContext {
    pub fn new(protocol: &str, host: &str, context: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            host: host.to_string(),
            context: normalize_context(context),
        }
    }

    /// Default address of a service
    pub fn address_for(&self, service_name: &str) -> String {
        format!(
            "{}://{}/{}{}",
            self.protocol, self.host, self.context, service_name
        )
    }
}

impl Default for EndpointContext {
    fn default() -> Self {
        Self::new("http", "localhost", "")
    }
}

/// Strip leading slashes and collapse trailing slashes to one.
pub fn normalize_context(context: &str) -> String {
    let trimmed = context.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

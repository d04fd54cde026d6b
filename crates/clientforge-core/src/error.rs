//! Error types for clientforge generation

use crate::render::Phase;
use thiserror::Error;

/// Result type alias for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Configuration problems, reported before generation starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required attribute is missing from a configuration element
    #[error("a '{attribute}' attribute must be specified on a {element} element")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// A package conversion rule is malformed
    #[error("invalid package conversion '{from}' -> '{to}': {reason}")]
    InvalidConversion {
        from: String,
        to: String,
        reason: String,
    },

    /// A conversion's source overlaps a conversion's target
    #[error("package conversion '{from}' would re-convert the output of '{chained_from}' -> '{chained_to}'")]
    ChainedConversion {
        from: String,
        chained_from: String,
        chained_to: String,
    },

    /// The run identifier cannot be used in artifact file names
    #[error("invalid run id '{0}': only ASCII letters, digits, '.', '_' and '-' are allowed")]
    InvalidRunId(String),

    /// The configuration document could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// The service model cannot be resolved into target identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelIntegrityError {
    /// An entity has no declared qualified name
    #[error("{entity} has no declared qualified name")]
    MissingQualifiedName { entity: String },

    /// A declared name is not a dotted sequence of non-empty segments
    #[error("malformed qualified name '{0}'")]
    MalformedName(String),

    /// Two distinct declarations resolved to the same identifier
    #[error("identifier '{identifier}' is claimed by both {first} and {second}")]
    IdentifierCollision {
        identifier: String,
        first: String,
        second: String,
    },
}

/// Failure reported by a renderer
#[derive(Error, Debug)]
pub enum RenderError {
    /// I/O error while writing generated output
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer cannot produce output for the request
    #[error("render failed for {identifier}: {message}")]
    Failed { identifier: String, message: String },
}

/// Error raised while running a generation phase
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The model could not be resolved
    #[error("{phase} phase: {source}")]
    ModelIntegrity {
        phase: Phase,
        #[source]
        source: ModelIntegrityError,
    },

    /// The renderer failed
    #[error("{phase} phase: {source}")]
    Render {
        phase: Phase,
        #[source]
        source: RenderError,
    },

    /// A variant worker thread panicked
    #[error("{phase} phase: worker thread panicked")]
    WorkerPanicked { phase: Phase },
}

impl GenerationError {
    /// Phase in which the error was raised
    pub fn phase(&self) -> Phase {
        match self {
            GenerationError::ModelIntegrity { phase, .. }
            | GenerationError::Render { phase, .. }
            | GenerationError::WorkerPanicked { phase } => *phase,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

//! # clientforge
//!
//! A build-time compiler that turns an abstract SOAP service model into Java
//! client stub sources, a type manifest and a binding metadata record.
//!
//! A run produces:
//! - source trees for a **legacy** (pre-generics) and a **modern** client
//! - `<run-id>.types`, every generated class name, one per line
//! - `<run-id>.bindings.json`, the descriptors a runtime needs to marshal
//!   wire messages without reading annotations from compiled classes
//!
//! ## Quick Start
//!
//! ```ignore
//! use clientforge::prelude::*;
//!
//! let config = ClientConfig::from_toml(&std::fs::read_to_string("clientforge.toml")?)?;
//! let model = ServiceModel::from_json(&std::fs::read("service-model.json")?)?;
//! let names = NameResolver::new(config.conversion_rules()?)?;
//!
//! let orchestrator = GenerationOrchestrator::new(&model, names, config.endpoint_context());
//! let output = orchestrator.run(&my_renderer)?;
//!
//! let run_id = config.resolve_run_id()?;
//! for phase in &output.variants {
//!     let dir = format!("build/{}/classes", phase.variant);
//!     MetadataPersistence::new(dir, run_id.clone()).persist(
//!         &output.common.manifest,
//!         &phase.registry,
//!         phase.variant,
//!     )?;
//! }
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`clientforge_core`] - Service model, name and fault resolution, binding
//!   registry and the generation orchestrator
//! - [`clientforge_bundle`] - Metadata persistence and archive packaging

// Re-export core types
pub use clientforge_core::{
    BindingRegistry, ClientConfig, CommonPhase, ConfigError, EndpointContext, EntryOrigin,
    FaultResolver, FrozenManifest, FrozenRegistry, GeneratedFile, GenerationError,
    GenerationOrchestrator, GenerationResult, ModelIntegrityError, NameResolver,
    PackageConversionRule, Phase, RecordBindings, RegistryOverlay, RenderError, RenderRequest,
    Renderer, ResolvedEndpoint, ResolvedFault, ResolvedOperation, ResolvedType, RunId, RunOutput,
    ServiceModel, TemplateId, TypeManifest, Variant, VariantPhase, model, registry, render,
};

// Re-export persistence and packaging types
pub use clientforge_bundle::{
    ArchiveBuilder, ArchiveLoader, BindingsDocument, LoadedBindings, MetadataPersistence,
    PersistedArtifacts, PersistenceError, PersistenceResult, persistence,
};

// Re-export common dependencies that front ends need
pub use serde;
pub use serde_json;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use clientforge::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        ClientConfig, GenerationError, GenerationOrchestrator, MetadataPersistence,
        NameResolver, PersistenceError, Phase, RenderError, RenderRequest, Renderer, RunId,
        RunOutput, ServiceModel, TemplateId, Variant,
    };

    pub use serde::{Deserialize, Serialize};
}

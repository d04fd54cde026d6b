//! clientforge-core - Service model, name resolution and generation orchestration
//!
//! This crate holds everything the compiler does before bytes hit the disk:
//! - [`ServiceModel`] and the rest of the [`model`] module, the input
//! - [`NameResolver`] for package conversion
//! - [`FaultResolver`] for fault deduplication and carrier resolution
//! - [`BindingRegistry`] and [`TypeManifest`], the metadata a run produces
//! - [`GenerationOrchestrator`], which drives the Common and Variant phases
//! - [`Renderer`], the seam to whatever turns view models into source text

mod config;
mod error;
mod fault;
mod jvm;
mod manifest;
pub mod model;
mod naming;
mod orchestrator;
pub mod registry;
pub mod render;
mod variant;

pub use config::{
    ClientConfig, ClientSection, CompileSection, DeploymentSection, EndpointContext,
    PackageConversion, PackageConversionRule, RunId, normalize_context,
};
pub use error::{
    ConfigError, GenerationError, GenerationResult, ModelIntegrityError, RenderError,
};
pub use fault::{FaultResolver, ResolvedFault, implicit_bean_name};
pub use jvm::{JvmType, map_primitive};
pub use manifest::{EntryOrigin, FrozenManifest, TypeManifest};
pub use model::ServiceModel;
pub use naming::NameResolver;
pub use orchestrator::{
    CommonPhase, GenerationOrchestrator, ResolvedEndpoint, ResolvedOperation, ResolvedType,
    RunOutput, VariantPhase,
};
pub use registry::{BindingRegistry, FrozenRegistry, RecordBindings, RegistryOverlay};
pub use render::{GeneratedFile, Phase, RenderRequest, Renderer, TemplateId};
pub use variant::Variant;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ClientConfig, CommonPhase, ConfigError, EndpointContext, GeneratedFile,
        GenerationError, GenerationOrchestrator, GenerationResult, ModelIntegrityError,
        NameResolver, Phase, RenderError, RenderRequest, Renderer, RunId, RunOutput,
        ServiceModel, TemplateId, Variant, VariantPhase,
    };
}

//! Rendering collaborator interface.
//!
//! The orchestrator never hands raw model entities to a renderer. Every
//! request carries a view model whose names are already resolved for the
//! phase being generated, so a renderer only has to format text.

use crate::error::RenderError;
use crate::model::{ParameterMode, TypeKind};
use crate::variant::Variant;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Generation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Artifacts shared by every variant.
    Common,
    /// Artifacts specific to one variant.
    Variant(Variant),
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Common => "common",
            Phase::Variant(variant) => variant.as_str(),
        }
    }

    /// Variant the phase generates for, if any.
    pub fn variant(&self) -> Option<Variant> {
        match self {
            Phase::Common => None,
            Phase::Variant(variant) => Some(*variant),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifact categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    // Common
    RequestBean,
    ResponseBean,
    FaultBean,
    BindingEnumType,
    BindingSimpleType,
    BindingComplexType,

    // Per variant
    EndpointInterface,
    SoapEndpointImpl,
    WebFault,
    LegacyEnumType,
    ModernEnumType,
    SimpleType,
    ComplexType,
}

impl TemplateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::RequestBean => "request-bean",
            TemplateId::ResponseBean => "response-bean",
            TemplateId::FaultBean => "fault-bean",
            TemplateId::BindingEnumType => "binding-enum-type",
            TemplateId::BindingSimpleType => "binding-simple-type",
            TemplateId::BindingComplexType => "binding-complex-type",
            TemplateId::EndpointInterface => "endpoint-interface",
            TemplateId::SoapEndpointImpl => "soap-endpoint-impl",
            TemplateId::WebFault => "web-fault",
            TemplateId::LegacyEnumType => "legacy-enum-type",
            TemplateId::ModernEnumType => "modern-enum-type",
            TemplateId::SimpleType => "simple-type",
            TemplateId::ComplexType => "complex-type",
        }
    }

    /// Binding-type template for a type kind (Common phase).
    pub fn binding_type(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Enum => TemplateId::BindingEnumType,
            TypeKind::Simple => TemplateId::BindingSimpleType,
            TypeKind::Complex => TemplateId::BindingComplexType,
        }
    }

    /// Type-stub template for a type kind in a variant.
    pub fn type_stub(kind: TypeKind, variant: Variant) -> Self {
        match (kind, variant) {
            (TypeKind::Enum, Variant::Legacy) => TemplateId::LegacyEnumType,
            (TypeKind::Enum, Variant::Modern) => TemplateId::ModernEnumType,
            (TypeKind::Simple, _) => TemplateId::SimpleType,
            (TypeKind::Complex, _) => TemplateId::ComplexType,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property of a bean or type, with its Java type already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyModel {
    /// Java property name.
    pub name: String,
    pub element_name: String,
    /// Full Java type, e.g. `int`, `long[]` or `java.util.List<Long>`.
    pub value_type: String,
    /// Element type when the property is repeated.
    pub component_type: Option<String>,
    pub attribute: bool,
}

/// Request, response or fault bean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeanModel {
    pub identifier: String,
    pub element_name: String,
    pub namespace: String,
    /// Properties in wire order.
    pub properties: Vec<PropertyModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootElementModel {
    pub name: String,
    pub namespace: String,
}

/// A schema type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeModel {
    pub identifier: String,
    pub kind: TypeKind,
    pub type_name: String,
    pub namespace: String,
    pub is_abstract: bool,
    /// Resolved supertype identifier.
    pub base: Option<String>,
    pub properties: Vec<PropertyModel>,
    pub enum_values: Vec<String>,
    /// Resolved underlying value type of a simple or enum type.
    pub value_type: Option<String>,
    pub root_element: Option<RootElementModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterModel {
    pub name: String,
    pub value_type: String,
    pub mode: ParameterMode,
    pub header: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationModel {
    pub method_name: String,
    pub operation_name: String,
    pub action: String,
    pub one_way: bool,
    pub parameters: Vec<ParameterModel>,
    /// `None` for `void`.
    pub return_type: Option<String>,
    pub request_bean: Option<String>,
    pub response_bean: Option<String>,
    /// Fault identifiers, in declaration order.
    pub faults: Vec<String>,
}

/// An endpoint interface and its SOAP implementation stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointModel {
    pub identifier: String,
    pub impl_identifier: String,
    pub service_name: String,
    pub port_type_name: String,
    pub port_name: String,
    pub target_namespace: String,
    pub default_address: String,
    pub operations: Vec<OperationModel>,
}

/// A fault class or its carrier bean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaultModel {
    pub identifier: String,
    pub carrier_bean_identifier: String,
    pub is_implicit: bool,
    pub element_name: String,
    pub namespace: String,
    /// Carrier properties; empty for explicit carriers.
    pub properties: Vec<PropertyModel>,
}

/// Data bound to a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderData {
    Bean(BeanModel),
    Type(TypeModel),
    Endpoint(EndpointModel),
    Fault(FaultModel),
}

impl RenderData {
    /// Identifier of the primary class the request produces.
    pub fn identifier(&self) -> &str {
        match self {
            RenderData::Bean(bean) => &bean.identifier,
            RenderData::Type(ty) => &ty.identifier,
            RenderData::Endpoint(endpoint) => &endpoint.identifier,
            RenderData::Fault(fault) => &fault.identifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRequest {
    pub template: TemplateId,
    pub data: RenderData,
}

impl RenderRequest {
    pub fn new(template: TemplateId, data: RenderData) -> Self {
        Self { template, data }
    }

    /// Identifier of the class this request renders.
    ///
    /// Implementation stubs and fault carrier beans render a class other than
    /// the primary identifier of their data.
    pub fn identifier(&self) -> &str {
        match (&self.template, &self.data) {
            (TemplateId::SoapEndpointImpl, RenderData::Endpoint(endpoint)) => &endpoint.impl_identifier,
            (TemplateId::FaultBean, RenderData::Fault(fault)) => &fault.carrier_bean_identifier,
            (_, data) => data.identifier(),
        }
    }
}

/// Turns render requests into files.
///
/// Variant phases share one renderer across threads.
pub trait Renderer: Send + Sync {
    /// Render a request and return the path of the written file.
    fn render(&self, phase: Phase, request: &RenderRequest) -> Result<PathBuf, RenderError>;
}

/// A file produced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub template: TemplateId,
    pub identifier: String,
    pub path: PathBuf,
}

//! Abstract service model.
//!
//! The model is produced once per compiler invocation by a front end (a WSDL or
//! annotated-source parser) and is read-only afterwards. It is serde-encoded so
//! any front end can hand it to the compiler as JSON.
//!
//! # Structure
//!
//! ```text
//! ServiceModel
//! ├── endpoints: namespace → EndpointGroup
//! │   └── Endpoint → Operation → Message (wrapper | rpc | fault)
//! └── schemas: namespace → SchemaGroup
//!     ├── TypeDefinition (enum | simple | complex)
//!     └── RootElementDeclaration
//! ```
//!
//! Namespaces are kept in ordered maps so every walk over the model visits
//! entities in the same order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root container handed to the compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceModel {
    /// Endpoints grouped by target namespace.
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointGroup>,

    /// Schema types grouped by namespace.
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaGroup>,
}

/// Endpoints declared in one namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointGroup {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Types and global elements declared in one namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaGroup {
    #[serde(default)]
    pub types: Vec<TypeDefinition>,

    #[serde(default)]
    pub root_elements: Vec<RootElementDeclaration>,
}

/// A named service interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Declared fully qualified interface name (e.g. `com.example.api.Orders`).
    #[serde(default)]
    pub qualified_name: Option<String>,

    pub simple_name: String,
    pub port_type_name: String,
    pub service_name: String,
    pub target_namespace: String,

    #[serde(default)]
    pub binding: SoapBinding,

    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// SOAP binding style/parameter-style/use triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoapBinding {
    #[serde(default)]
    pub style: BindingStyle,

    #[serde(default)]
    pub parameter_style: ParameterStyle,

    #[serde(default, rename = "use")]
    pub use_: BindingUse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingStyle {
    #[default]
    Document,
    Rpc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterStyle {
    #[default]
    Wrapped,
    Bare,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingUse {
    #[default]
    Literal,
    Encoded,
}

/// A remote-callable method on an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Simple method name.
    pub name: String,

    /// Operation name on the wire.
    pub operation_name: String,

    #[serde(default)]
    pub action: String,

    #[serde(default)]
    pub one_way: bool,

    #[serde(default)]
    pub binding: SoapBinding,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub result: OperationResult,

    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Direction of a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterMode {
    #[default]
    In,
    Out,
    InOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub element_name: String,

    #[serde(default)]
    pub part_name: String,

    #[serde(default)]
    pub header: bool,

    #[serde(default)]
    pub mode: ParameterMode,

    pub value_type: TypeRef,

    #[serde(default)]
    pub repeated: bool,
}

/// Return value of an operation. A missing value type means `void`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub part_name: String,

    #[serde(default)]
    pub target_namespace: String,

    #[serde(default)]
    pub header: bool,

    #[serde(default)]
    pub value_type: Option<TypeRef>,

    #[serde(default)]
    pub repeated: bool,
}

/// Payloads exchanged by an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    RequestWrapper(WrapperMessage),
    ResponseWrapper(WrapperMessage),
    RpcInput(RpcMessage),
    RpcOutput(RpcMessage),
    Fault(FaultMessage),
}

/// Document/literal wrapper element and its synthesized bean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapperMessage {
    pub element_name: String,
    pub element_namespace: String,

    /// Declared qualified name of the wrapper bean.
    #[serde(default)]
    pub bean_name: Option<String>,

    #[serde(default)]
    pub children: Vec<ChildElement>,
}

/// RPC-style input or output; its shape is derived from the operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcMessage {
    #[serde(default)]
    pub bean_name: Option<String>,
}

/// A fault an operation may throw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultMessage {
    /// Declared qualified name of the fault type; the deduplication key.
    #[serde(default)]
    pub qualified_name: Option<String>,

    pub element_name: String,
    pub target_namespace: String,
    pub carrier: FaultCarrier,
}

/// Where the fault's wire payload comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaultCarrier {
    /// The compiler synthesizes a bean from the fault's properties.
    Implicit {
        #[serde(default)]
        bean_name: Option<String>,

        #[serde(default)]
        children: Vec<ChildElement>,
    },

    /// The fault reuses a type declared in the schema.
    Explicit {
        type_name: String,
        element_name: String,
        namespace: String,
    },
}

/// An ordered child element of a wrapper or bean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildElement {
    pub element_name: String,
    pub value_type: TypeRef,

    #[serde(default)]
    pub repeated: bool,
}

/// Reference to a value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Primitive(Primitive),
    /// Declared qualified name of a model type.
    Named(String),
}

/// Built-in schema value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Integer,
    DateTime,
    Base64Binary,
    Qname,
    AnyUri,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Enum,
    Simple,
    Complex,
}

/// A schema type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    #[serde(default)]
    pub qualified_name: Option<String>,

    pub namespace: String,

    /// Local schema type name.
    pub type_name: String,

    pub kind: TypeKind,

    #[serde(default)]
    pub is_abstract: bool,

    /// Declared qualified name of the supertype, if any.
    #[serde(default)]
    pub base: Option<String>,

    #[serde(default)]
    pub members: Vec<Member>,

    #[serde(default)]
    pub enum_values: Vec<String>,

    /// Underlying value of a simple or enum type.
    #[serde(default)]
    pub value_type: Option<TypeRef>,
}

/// A property of a complex type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub element_name: String,
    pub value_type: TypeRef,

    #[serde(default)]
    pub repeated: bool,

    #[serde(default)]
    pub attribute: bool,
}

/// A global element bound to a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootElementDeclaration {
    pub name: String,
    pub namespace: String,

    #[serde(default)]
    pub qualified_name: Option<String>,
}

/// A model entity that carries a declared qualified name.
pub trait Declared {
    /// The declared fully qualified name, if any.
    fn declared_name(&self) -> Option<&str>;

    /// Human-readable description used in error messages.
    fn describe(&self) -> String;
}

impl Declared for Endpoint {
    fn declared_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    fn describe(&self) -> String {
        format!("endpoint '{}'", self.simple_name)
    }
}

impl Declared for TypeDefinition {
    fn declared_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    fn describe(&self) -> String {
        format!("type '{{{}}}{}'", self.namespace, self.type_name)
    }
}

impl Declared for FaultMessage {
    fn declared_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    fn describe(&self) -> String {
        format!("fault '{{{}}}{}'", self.target_namespace, self.element_name)
    }
}

impl Declared for RootElementDeclaration {
    fn declared_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    fn describe(&self) -> String {
        format!("root element '{{{}}}{}'", self.namespace, self.name)
    }
}

impl Declared for WrapperMessage {
    fn declared_name(&self) -> Option<&str> {
        self.bean_name.as_deref()
    }

    fn describe(&self) -> String {
        format!("wrapper '{{{}}}{}'", self.element_namespace, self.element_name)
    }
}

impl ServiceModel {
    /// Parse a model from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// All endpoints, in namespace order.
    pub fn all_endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values().flat_map(|group| group.endpoints.iter())
    }

    /// All type definitions, in namespace order.
    pub fn all_types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.schemas.values().flat_map(|group| group.types.iter())
    }

    /// All root element declarations, in namespace order.
    pub fn all_root_elements(&self) -> impl Iterator<Item = &RootElementDeclaration> {
        self.schemas
            .values()
            .flat_map(|group| group.root_elements.iter())
    }

    /// Find the root element bound to a type definition.
    pub fn find_root_element(&self, ty: &TypeDefinition) -> Option<&RootElementDeclaration> {
        let name = ty.qualified_name.as_deref()?;
        self.all_root_elements()
            .find(|root| root.qualified_name.as_deref() == Some(name))
    }

    /// Whether the model declares nothing at all.
    pub fn is_empty(&self) -> bool {
        self.all_endpoints().next().is_none()
            && self.all_types().next().is_none()
            && self.all_root_elements().next().is_none()
    }
}

impl Endpoint {
    /// Create an endpoint with document/literal/wrapped binding and no operations.
    pub fn new(
        qualified_name: impl Into<String>,
        service_name: impl Into<String>,
        target_namespace: impl Into<String>,
    ) -> Self {
        let qualified_name = qualified_name.into();
        let simple_name = qualified_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            port_type_name: simple_name.clone(),
            simple_name,
            qualified_name: Some(qualified_name),
            service_name: service_name.into(),
            target_namespace: target_namespace.into(),
            binding: SoapBinding::default(),
            operations: Vec::new(),
        }
    }
}

impl Operation {
    /// Create an operation whose wire name equals its method name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            operation_name: name.clone(),
            name,
            action: String::new(),
            one_way: false,
            binding: SoapBinding::default(),
            parameters: Vec::new(),
            result: OperationResult::default(),
            messages: Vec::new(),
        }
    }

    /// Fault messages declared by this operation.
    pub fn faults(&self) -> impl Iterator<Item = &FaultMessage> {
        self.messages.iter().filter_map(|message| match message {
            Message::Fault(fault) => Some(fault),
            _ => None,
        })
    }

    /// Child elements of the RPC input bean: non-header in/inout parameters.
    pub fn rpc_input_children(&self) -> Vec<ChildElement> {
        self.parameters
            .iter()
            .filter(|p| !p.header && matches!(p.mode, ParameterMode::In | ParameterMode::InOut))
            .map(Parameter::as_child)
            .collect()
    }

    /// Child elements of the RPC output bean: the result, then out/inout parameters.
    pub fn rpc_output_children(&self) -> Vec<ChildElement> {
        let mut children = Vec::new();
        if let Some(value_type) = &self.result.value_type
            && !self.result.header
        {
            children.push(ChildElement {
                element_name: self.result.name.clone(),
                value_type: value_type.clone(),
                repeated: self.result.repeated,
            });
        }
        children.extend(
            self.parameters
                .iter()
                .filter(|p| {
                    !p.header && matches!(p.mode, ParameterMode::Out | ParameterMode::InOut)
                })
                .map(Parameter::as_child),
        );
        children
    }

    /// Adapt an RPC message to the wrapper shape.
    ///
    /// The input element is named after the operation and the output element
    /// after the operation plus `Response`, both in the endpoint's namespace.
    pub fn adapt_rpc(&self, message: &RpcMessage, namespace: &str, output: bool) -> WrapperMessage {
        let (element_name, children) = if output {
            (
                format!("{}Response", self.operation_name),
                self.rpc_output_children(),
            )
        } else {
            (self.operation_name.clone(), self.rpc_input_children())
        };
        WrapperMessage {
            element_name,
            element_namespace: namespace.to_string(),
            bean_name: message.bean_name.clone(),
            children,
        }
    }
}

impl Parameter {
    fn as_child(&self) -> ChildElement {
        ChildElement {
            element_name: self.element_name.clone(),
            value_type: self.value_type.clone(),
            repeated: self.repeated,
        }
    }
}

impl ChildElement {
    pub fn new(element_name: impl Into<String>, value_type: TypeRef) -> Self {
        Self {
            element_name: element_name.into(),
            value_type,
            repeated: false,
        }
    }
}

impl WrapperMessage {
    pub fn new(
        element_name: impl Into<String>,
        element_namespace: impl Into<String>,
        bean_name: impl Into<String>,
        children: Vec<ChildElement>,
    ) -> Self {
        Self {
            element_name: element_name.into(),
            element_namespace: element_namespace.into(),
            bean_name: Some(bean_name.into()),
            children,
        }
    }

    /// Child element names in declaration order.
    pub fn property_order(&self) -> Vec<String> {
        self.children
            .iter()
            .map(|child| child.element_name.clone())
            .collect()
    }
}

impl TypeDefinition {
    pub fn new(
        qualified_name: impl Into<String>,
        namespace: impl Into<String>,
        kind: TypeKind,
    ) -> Self {
        let qualified_name = qualified_name.into();
        let type_name = qualified_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            qualified_name: Some(qualified_name),
            namespace: namespace.into(),
            type_name,
            kind,
            is_abstract: false,
            base: None,
            members: Vec::new(),
            enum_values: Vec::new(),
            value_type: None,
        }
    }
}

//! Binding metadata registry.
//!
//! The registry replaces binding annotations that a legacy runtime cannot read
//! from compiled classes. It maps a key to one descriptor per
//! [`DescriptorKind`]:
//!
//! | Key | Kinds |
//! |-----|-------|
//! | `com.x.Orders` (endpoint class) | service, soap-binding |
//! | `com.x.Orders.place` (method) | soap-binding, operation, result, one-way |
//! | `com.x.Orders.place.0` (parameter) | parameter |
//! | `com.x.jaxws.Place` (bean) | wrapper |
//! | `com.x.OrderFault` (fault class) | fault-mapping |
//! | `com.x.Order` (root element class) | root-element |
//!
//! Wrapper descriptors carry the child element order. The runtime marshals
//! wrapper content positionally from this list.

use crate::model::{BindingStyle, BindingUse, ParameterMode, ParameterStyle, SoapBinding};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Descriptor kinds, one slot per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    Service,
    SoapBinding,
    Operation,
    Result,
    Parameter,
    Wrapper,
    FaultMapping,
    RootElement,
    OneWay,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DescriptorKind::Service => "service",
            DescriptorKind::SoapBinding => "soap-binding",
            DescriptorKind::Operation => "operation",
            DescriptorKind::Result => "result",
            DescriptorKind::Parameter => "parameter",
            DescriptorKind::Wrapper => "wrapper",
            DescriptorKind::FaultMapping => "fault-mapping",
            DescriptorKind::RootElement => "root-element",
            DescriptorKind::OneWay => "one-way",
        };
        f.write_str(name)
    }
}

/// A binding descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Descriptor {
    Service(ServiceDescriptor),
    SoapBinding(SoapBindingDescriptor),
    Operation(OperationDescriptor),
    Result(ResultDescriptor),
    Parameter(ParameterDescriptor),
    Wrapper(WrapperDescriptor),
    FaultMapping(FaultMappingDescriptor),
    RootElement(RootElementDescriptor),
    OneWay,
}

impl Descriptor {
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::Service(_) => DescriptorKind::Service,
            Descriptor::SoapBinding(_) => DescriptorKind::SoapBinding,
            Descriptor::Operation(_) => DescriptorKind::Operation,
            Descriptor::Result(_) => DescriptorKind::Result,
            Descriptor::Parameter(_) => DescriptorKind::Parameter,
            Descriptor::Wrapper(_) => DescriptorKind::Wrapper,
            Descriptor::FaultMapping(_) => DescriptorKind::FaultMapping,
            Descriptor::RootElement(_) => DescriptorKind::RootElement,
            Descriptor::OneWay => DescriptorKind::OneWay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Port type name.
    pub name: String,
    pub port_name: String,
    pub service_name: String,
    pub target_namespace: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoapBindingDescriptor {
    pub style: BindingStyle,
    pub parameter_style: ParameterStyle,
    #[serde(rename = "use")]
    pub use_: BindingUse,
}

impl From<SoapBinding> for SoapBindingDescriptor {
    fn from(binding: SoapBinding) -> Self {
        Self {
            style: binding.style,
            parameter_style: binding.parameter_style,
            use_: binding.use_,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub operation_name: String,
    pub action: String,

    /// Bean identifier of the request wrapper, if the operation has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_wrapper: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_wrapper: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDescriptor {
    pub name: String,
    pub part_name: String,
    pub target_namespace: String,
    pub header: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub part_name: String,
    pub mode: ParameterMode,
    pub header: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapperRole {
    Request,
    Response,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperDescriptor {
    pub role: WrapperRole,
    pub element_name: String,
    pub namespace: String,
    /// Child element names in declaration order.
    pub property_order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultMappingDescriptor {
    pub element_name: String,
    pub namespace: String,
    pub carrier_bean: String,
    pub implicit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootElementDescriptor {
    pub name: String,
    pub namespace: String,
}

/// Key of a method-level descriptor.
pub fn method_key(class: &str, method: &str) -> String {
    format!("{class}.{method}")
}

/// Key of a parameter descriptor.
pub fn parameter_key(method_key: &str, index: usize) -> String {
    format!("{method_key}.{index}")
}

/// A second, different descriptor recorded for a `(key, kind)` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConflict {
    pub key: String,
    pub kind: DescriptorKind,
    pub previous: Descriptor,
    pub incoming: Descriptor,
    /// Whether the new descriptor replaced the previous one.
    pub replaced: bool,
}

/// Recording operations shared by the registry and per-variant overlays.
pub trait RecordBindings {
    /// Store a descriptor under `key`.
    fn insert(&mut self, key: String, descriptor: Descriptor);

    fn record_service(&mut self, class: &str, descriptor: ServiceDescriptor) {
        self.insert(class.to_string(), Descriptor::Service(descriptor));
    }

    fn record_soap_binding(&mut self, key: &str, binding: SoapBinding) {
        self.insert(key.to_string(), Descriptor::SoapBinding(binding.into()));
    }

    fn record_operation(&mut self, method_key: &str, descriptor: OperationDescriptor) {
        self.insert(method_key.to_string(), Descriptor::Operation(descriptor));
    }

    fn record_result(&mut self, method_key: &str, descriptor: ResultDescriptor) {
        self.insert(method_key.to_string(), Descriptor::Result(descriptor));
    }

    fn record_parameter(&mut self, method_key: &str, index: usize, descriptor: ParameterDescriptor) {
        self.insert(parameter_key(method_key, index), Descriptor::Parameter(descriptor));
    }

    fn record_wrapper(&mut self, bean: &str, descriptor: WrapperDescriptor) {
        self.insert(bean.to_string(), Descriptor::Wrapper(descriptor));
    }

    fn record_fault_mapping(&mut self, fault_class: &str, descriptor: FaultMappingDescriptor) {
        self.insert(fault_class.to_string(), Descriptor::FaultMapping(descriptor));
    }

    fn record_root_element(&mut self, class: &str, descriptor: RootElementDescriptor) {
        self.insert(class.to_string(), Descriptor::RootElement(descriptor));
    }

    fn mark_one_way(&mut self, method_key: &str) {
        self.insert(method_key.to_string(), Descriptor::OneWay);
    }
}

type Slot = (String, DescriptorKind);

/// Registry being populated during the Common walk.
#[derive(Debug, Clone, Default)]
pub struct BindingRegistry {
    entries: BTreeMap<Slot, Descriptor>,
    conflicts: Vec<RegistryConflict>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str, kind: DescriptorKind) -> Option<&Descriptor> {
        self.entries.get(&(key.to_string(), kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn conflicts(&self) -> &[RegistryConflict] {
        &self.conflicts
    }

    /// Stop accepting descriptors.
    pub fn freeze(self) -> FrozenRegistry {
        FrozenRegistry {
            entries: self.entries,
            conflicts: self.conflicts,
        }
    }
}

impl RecordBindings for BindingRegistry {
    fn insert(&mut self, key: String, descriptor: Descriptor) {
        let kind = descriptor.kind();
        let slot = (key, kind);
        if let Some(previous) = self.entries.get(&slot)
            && *previous != descriptor
        {
            tracing::warn!(
                key = %slot.0,
                kind = %kind,
                "conflicting binding descriptors recorded; keeping the last one"
            );
            self.conflicts.push(RegistryConflict {
                key: slot.0.clone(),
                kind,
                previous: previous.clone(),
                incoming: descriptor.clone(),
                replaced: true,
            });
        }
        self.entries.insert(slot, descriptor);
    }
}

/// Read-only registry.
#[derive(Debug, Clone, Default)]
pub struct FrozenRegistry {
    entries: BTreeMap<Slot, Descriptor>,
    conflicts: Vec<RegistryConflict>,
}

impl FrozenRegistry {
    /// Rebuild a registry from persisted entries.
    ///
    /// Returns the offending key if a `(key, kind)` slot appears twice.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, Descriptor)>,
    ) -> Result<Self, (String, DescriptorKind)> {
        let mut map = BTreeMap::new();
        for (key, descriptor) in entries {
            let slot = (key, descriptor.kind());
            if map.contains_key(&slot) {
                return Err(slot);
            }
            map.insert(slot, descriptor);
        }
        Ok(Self {
            entries: map,
            conflicts: Vec::new(),
        })
    }

    pub fn get(&self, key: &str, kind: DescriptorKind) -> Option<&Descriptor> {
        self.entries.get(&(key.to_string(), kind))
    }

    /// Wrapper property order recorded for a bean.
    pub fn property_order(&self, bean: &str) -> Option<&[String]> {
        match self.get(bean, DescriptorKind::Wrapper) {
            Some(Descriptor::Wrapper(wrapper)) => Some(&wrapper.property_order),
            _ => None,
        }
    }

    /// All entries, sorted by key then kind.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.entries
            .iter()
            .map(|((key, _), descriptor)| (key.as_str(), descriptor))
    }

    /// Entries of one kind, sorted by key.
    pub fn entries_of(&self, kind: DescriptorKind) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.entries
            .iter()
            .filter(move |((_, k), _)| *k == kind)
            .map(|((key, _), descriptor)| (key.as_str(), descriptor))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Conflicts observed while the registry was populated.
    pub fn conflicts(&self) -> &[RegistryConflict] {
        &self.conflicts
    }
}

/// Registries are equal when they hold the same descriptors.
impl PartialEq for FrozenRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for FrozenRegistry {}

/// Variant-specific additions layered over a frozen Common registry.
///
/// Slots already filled by the base are never overwritten.
#[derive(Debug)]
pub struct RegistryOverlay<'a> {
    base: &'a FrozenRegistry,
    additions: BindingRegistry,
}

impl<'a> RegistryOverlay<'a> {
    pub fn new(base: &'a FrozenRegistry) -> Self {
        Self {
            base,
            additions: BindingRegistry::new(),
        }
    }

    /// Number of descriptors added on top of the base.
    pub fn additions(&self) -> usize {
        self.additions.len()
    }

    /// Merge base and additions into a new frozen registry.
    pub fn freeze(self) -> FrozenRegistry {
        let mut entries = self.base.entries.clone();
        entries.extend(self.additions.entries);
        let mut conflicts = self.base.conflicts.clone();
        conflicts.extend(self.additions.conflicts);
        FrozenRegistry { entries, conflicts }
    }
}

impl RecordBindings for RegistryOverlay<'_> {
    fn insert(&mut self, key: String, descriptor: Descriptor) {
        let kind = descriptor.kind();
        if let Some(previous) = self.base.get(&key, kind) {
            if *previous != descriptor {
                tracing::warn!(
                    key = %key,
                    kind = %kind,
                    "variant descriptor conflicts with a common descriptor; keeping the common one"
                );
                self.additions.conflicts.push(RegistryConflict {
                    key,
                    kind,
                    previous: previous.clone(),
                    incoming: descriptor,
                    replaced: false,
                });
            }
            return;
        }
        self.additions.insert(key, descriptor);
    }
}

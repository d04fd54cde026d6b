//! Generation orchestration.
//!
//! A run has three phases:
//!
//! 1. **Common** walks the model once. It resolves every endpoint, bean,
//!    fault and type identifier, renders the artifacts shared by all
//!    variants, fills the type manifest and the binding registry, then freezes
//!    both.
//! 2. **Variant(legacy)** and **Variant(modern)** read the frozen Common
//!    result and render the interface, implementation stub, fault and type
//!    stub artifacts for their idiom. Each keeps its own registry overlay.
//!
//! The variant phases never touch Common state mutably, so [`GenerationOrchestrator::run`]
//! executes them on scoped threads.

use crate::config::EndpointContext;
use crate::error::{GenerationError, GenerationResult, ModelIntegrityError};
use crate::fault::{FaultResolver, ResolvedFault};
use crate::manifest::{EntryOrigin, FrozenManifest, TypeManifest};
use crate::model::{
    ChildElement, Declared, FaultCarrier, FaultMessage, Message, Operation, ServiceModel, SoapBinding,
    TypeDefinition, TypeRef, WrapperMessage,
};
use crate::naming::NameResolver;
use crate::registry::{
    BindingRegistry, FaultMappingDescriptor, FrozenRegistry, OperationDescriptor,
    ParameterDescriptor, RecordBindings, RegistryOverlay, ResultDescriptor,
    RootElementDescriptor, ServiceDescriptor, WrapperDescriptor, WrapperRole, method_key,
};
use crate::render::{
    BeanModel, EndpointModel, FaultModel, GeneratedFile, OperationModel, ParameterModel, Phase,
    PropertyModel, RenderData, RenderRequest, Renderer, RootElementModel, TemplateId, TypeModel,
};
use crate::variant::Variant;
use std::collections::HashMap;
use std::thread;
use tracing::{debug, info};

/// An endpoint with its identifiers resolved during the Common phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoint {
    /// Resolved identifier of the endpoint interface.
    pub identifier: String,
    /// Resolved identifier of the implementation stub.
    pub impl_identifier: String,
    pub port_name: String,
    pub port_type_name: String,
    pub service_name: String,
    pub target_namespace: String,
    pub binding: SoapBinding,
    pub operations: Vec<ResolvedOperation>,
}

/// An operation with its bean and fault identifiers resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOperation {
    /// Registry key of the operation (`<interface>.<method>`).
    pub method_key: String,

    /// Bean carrying the request, from a wrapper or an RPC input.
    pub request_bean: Option<String>,

    /// Bean carrying the response, from a wrapper or an RPC output.
    pub response_bean: Option<String>,

    /// Fault identifiers in declaration order.
    pub faults: Vec<String>,

    /// The declared operation.
    pub operation: Operation,
}

/// A type definition with its identifier resolved during the Common phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedType {
    /// Resolved identifier of the type class.
    pub identifier: String,

    /// Root element bound to this type, if any.
    pub root_element: Option<RootElementModel>,

    /// The declared type.
    pub definition: TypeDefinition,
}

/// Frozen result of the Common phase.
#[derive(Debug, Clone)]
pub struct CommonPhase {
    /// Every generated bean and concrete type, in production order.
    pub manifest: FrozenManifest,

    /// Binding descriptors shared by both variants.
    pub registry: FrozenRegistry,

    /// Distinct faults, sorted by fault identifier.
    pub faults: Vec<ResolvedFault>,

    /// Endpoints in model order.
    pub endpoints: Vec<ResolvedEndpoint>,

    /// Type definitions in model order, abstract ones included.
    pub types: Vec<ResolvedType>,

    /// Files rendered for the shared sources.
    pub files: Vec<GeneratedFile>,
}

/// Result of one variant phase.
#[derive(Debug, Clone)]
pub struct VariantPhase {
    /// The idiom this phase rendered.
    pub variant: Variant,

    /// Common registry merged with the variant's additions.
    pub registry: FrozenRegistry,

    /// Files rendered for this variant only.
    pub files: Vec<GeneratedFile>,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub common: CommonPhase,
    /// One entry per variant, in [`Variant::all`] order.
    pub variants: Vec<VariantPhase>,
}

impl RunOutput {
    pub fn variant(&self, variant: Variant) -> Option<&VariantPhase> {
        self.variants.iter().find(|phase| phase.variant == variant)
    }

    /// Every source file a variant compiles: Common files then its own.
    pub fn sources_for(&self, variant: Variant) -> Vec<&GeneratedFile> {
        let own = self
            .variant(variant)
            .map(|phase| phase.files.as_slice())
            .unwrap_or_default();
        self.common.files.iter().chain(own).collect()
    }
}

/// Drives the Common and Variant phases over one service model.
#[derive(Debug)]
pub struct GenerationOrchestrator<'m> {
    model: &'m ServiceModel,
    names: NameResolver,
    context: EndpointContext,
}

impl<'m> GenerationOrchestrator<'m> {
    pub fn new(model: &'m ServiceModel, names: NameResolver, context: EndpointContext) -> Self {
        Self {
            model,
            names,
            context,
        }
    }

    pub fn names(&self) -> &NameResolver {
        &self.names
    }

    pub fn context(&self) -> &EndpointContext {
        &self.context
    }

    /// Run Common, then both variants concurrently.
    ///
    /// When several phases fail, the error of the first failing variant in
    /// [`Variant::all`] order is returned.
    pub fn run(&self, renderer: &dyn Renderer) -> GenerationResult<RunOutput> {
        let common = self.run_common(renderer)?;

        let common_ref = &common;
        let results: Vec<GenerationResult<VariantPhase>> = thread::scope(|scope| {
            let handles: Vec<_> = Variant::all()
                .iter()
                .map(|&variant| {
                    let handle =
                        scope.spawn(move || self.run_variant(common_ref, variant, renderer));
                    (variant, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(variant, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(GenerationError::WorkerPanicked {
                            phase: Phase::Variant(variant),
                        })
                    })
                })
                .collect()
        });

        let variants = results.into_iter().collect::<GenerationResult<Vec<_>>>()?;
        Ok(RunOutput { common, variants })
    }

    /// Walk the model once and produce the frozen Common result.
    pub fn run_common(&self, renderer: &dyn Renderer) -> GenerationResult<CommonPhase> {
        info!(
            endpoints = self.model.all_endpoints().count(),
            types = self.model.all_types().count(),
            "generating common client classes"
        );

        let mut walk = CommonWalk {
            names: &self.names,
            manifest: TypeManifest::new(),
            wrappers: HashMap::new(),
            registry: BindingRegistry::new(),
            emitter: Emitter::new(Phase::Common, renderer),
        };
        let phase = Phase::Common;

        let mut deferred: Vec<&FaultMessage> = Vec::new();
        let mut endpoints = Vec::new();
        for endpoint in self.model.all_endpoints() {
            let identifier = self.names.resolve_entity(endpoint).map_err(integrity(phase))?;
            let port_name = format!("{}SOAPPort", endpoint.simple_name);
            walk.registry.record_service(
                &identifier,
                ServiceDescriptor {
                    name: endpoint.port_type_name.clone(),
                    port_name: port_name.clone(),
                    service_name: endpoint.service_name.clone(),
                    target_namespace: endpoint.target_namespace.clone(),
                },
            );
            walk.registry.record_soap_binding(&identifier, endpoint.binding);

            let mut operations = Vec::with_capacity(endpoint.operations.len());
            for operation in &endpoint.operations {
                let resolved =
                    walk.operation(&identifier, &endpoint.target_namespace, operation)?;
                deferred.extend(operation.faults());
                operations.push(resolved);
            }

            endpoints.push(ResolvedEndpoint {
                impl_identifier: format!("{identifier}Impl"),
                identifier,
                port_name,
                port_type_name: endpoint.port_type_name.clone(),
                service_name: endpoint.service_name.clone(),
                target_namespace: endpoint.target_namespace.clone(),
                binding: endpoint.binding,
                operations,
            });
        }

        let faults = FaultResolver::resolve(deferred, &self.names).map_err(integrity(phase))?;
        for fault in &faults {
            walk.fault(fault)?;
        }

        let mut types = Vec::new();
        for definition in self.model.all_types() {
            let identifier = self.names.resolve_entity(definition).map_err(integrity(phase))?;
            let resolved = ResolvedType {
                identifier,
                root_element: self.model.find_root_element(definition).map(|root| {
                    RootElementModel {
                        name: root.name.clone(),
                        namespace: root.namespace.clone(),
                    }
                }),
                definition: definition.clone(),
            };
            walk.type_definition(&resolved)?;
            types.push(resolved);
        }

        for root in self.model.all_root_elements() {
            let identifier = self.names.resolve_entity(root).map_err(integrity(phase))?;
            walk.registry.record_root_element(
                &identifier,
                RootElementDescriptor {
                    name: root.name.clone(),
                    namespace: root.namespace.clone(),
                },
            );
        }

        let common = CommonPhase {
            manifest: walk.manifest.freeze(),
            registry: walk.registry.freeze(),
            faults,
            endpoints,
            types,
            files: walk.emitter.files,
        };
        info!(
            manifest = common.manifest.len(),
            bindings = common.registry.len(),
            faults = common.faults.len(),
            files = common.files.len(),
            "common client classes generated"
        );
        Ok(common)
    }

    /// Render the artifacts of one variant from a completed Common phase.
    pub fn run_variant(
        &self,
        common: &CommonPhase,
        variant: Variant,
        renderer: &dyn Renderer,
    ) -> GenerationResult<VariantPhase> {
        let phase = Phase::Variant(variant);
        info!(variant = %variant, "generating client classes");

        let mut overlay = RegistryOverlay::new(&common.registry);
        let mut emitter = Emitter::new(phase, renderer);

        for endpoint in &common.endpoints {
            let model = self.endpoint_model(endpoint, variant).map_err(integrity(phase))?;
            emitter.emit(TemplateId::EndpointInterface, RenderData::Endpoint(model.clone()))?;
            emitter.emit(TemplateId::SoapEndpointImpl, RenderData::Endpoint(model))?;

            overlay.record_service(
                &endpoint.impl_identifier,
                ServiceDescriptor {
                    name: endpoint.port_type_name.clone(),
                    port_name: endpoint.port_name.clone(),
                    service_name: endpoint.service_name.clone(),
                    target_namespace: endpoint.target_namespace.clone(),
                },
            );
            overlay.record_soap_binding(&endpoint.impl_identifier, endpoint.binding);
        }

        for fault in &common.faults {
            let model = fault_model(&self.names, fault, variant).map_err(integrity(phase))?;
            emitter.emit(TemplateId::WebFault, RenderData::Fault(model))?;
        }

        for ty in &common.types {
            let model = type_model(&self.names, ty, variant).map_err(integrity(phase))?;
            emitter.emit(
                TemplateId::type_stub(ty.definition.kind, variant),
                RenderData::Type(model),
            )?;
        }

        let added = overlay.additions();
        let result = VariantPhase {
            variant,
            registry: overlay.freeze(),
            files: emitter.files,
        };
        info!(
            variant = %variant,
            files = result.files.len(),
            bindings_added = added,
            "client classes generated"
        );
        Ok(result)
    }

    fn endpoint_model(
        &self,
        endpoint: &ResolvedEndpoint,
        variant: Variant,
    ) -> Result<EndpointModel, ModelIntegrityError> {
        let operations = endpoint
            .operations
            .iter()
            .map(|resolved| operation_model(&self.names, resolved, variant))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EndpointModel {
            identifier: endpoint.identifier.clone(),
            impl_identifier: endpoint.impl_identifier.clone(),
            service_name: endpoint.service_name.clone(),
            port_type_name: endpoint.port_type_name.clone(),
            port_name: endpoint.port_name.clone(),
            target_namespace: endpoint.target_namespace.clone(),
            default_address: self.context.address_for(&endpoint.service_name),
            operations,
        })
    }
}

/// Mutable state of the Common walk.
struct CommonWalk<'o> {
    names: &'o NameResolver,
    manifest: TypeManifest,
    /// First declaration seen for each wrapper bean identifier.
    wrappers: HashMap<String, (WrapperRole, WrapperMessage)>,
    registry: BindingRegistry,
    emitter: Emitter<'o>,
}

impl CommonWalk<'_> {
    fn operation(
        &mut self,
        class: &str,
        namespace: &str,
        operation: &Operation,
    ) -> GenerationResult<ResolvedOperation> {
        let phase = Phase::Common;
        let key = method_key(class, &operation.name);

        let mut request_bean = None;
        let mut response_bean = None;
        let mut request_wrapper = None;
        let mut response_wrapper = None;
        let mut faults: Vec<String> = Vec::new();

        for message in &operation.messages {
            match message {
                Message::RequestWrapper(wrapper) => {
                    let bean = self.wrapper(wrapper, WrapperRole::Request)?;
                    request_wrapper = Some(bean.clone());
                    request_bean = Some(bean);
                }
                Message::ResponseWrapper(wrapper) => {
                    let bean = self.wrapper(wrapper, WrapperRole::Response)?;
                    response_wrapper = Some(bean.clone());
                    response_bean = Some(bean);
                }
                Message::RpcInput(rpc) => {
                    let adapted = operation.adapt_rpc(rpc, namespace, false);
                    request_bean = Some(self.wrapper(&adapted, WrapperRole::Request)?);
                }
                Message::RpcOutput(rpc) => {
                    let adapted = operation.adapt_rpc(rpc, namespace, true);
                    response_bean = Some(self.wrapper(&adapted, WrapperRole::Response)?);
                }
                Message::Fault(fault) => {
                    let identifier = self.names.resolve_entity(fault).map_err(integrity(phase))?;
                    if !faults.contains(&identifier) {
                        faults.push(identifier);
                    }
                }
            }
        }

        self.registry.record_soap_binding(&key, operation.binding);
        self.registry.record_operation(
            &key,
            OperationDescriptor {
                operation_name: operation.operation_name.clone(),
                action: operation.action.clone(),
                request_wrapper,
                response_wrapper,
            },
        );
        self.registry.record_result(
            &key,
            ResultDescriptor {
                name: operation.result.name.clone(),
                part_name: operation.result.part_name.clone(),
                target_namespace: operation.result.target_namespace.clone(),
                header: operation.result.header,
            },
        );
        if operation.one_way {
            self.registry.mark_one_way(&key);
        }
        for (index, parameter) in operation.parameters.iter().enumerate() {
            self.registry.record_parameter(
                &key,
                index,
                ParameterDescriptor {
                    name: parameter.element_name.clone(),
                    part_name: parameter.part_name.clone(),
                    mode: parameter.mode,
                    header: parameter.header,
                },
            );
        }

        Ok(ResolvedOperation {
            method_key: key,
            request_bean,
            response_bean,
            faults,
            operation: operation.clone(),
        })
    }

    /// Record a wrapper and render its bean the first time it is produced.
    ///
    /// A repeated wrapper must match the first declaration exactly; anything
    /// else resolving to the same identifier is a collision.
    fn wrapper(&mut self, wrapper: &WrapperMessage, role: WrapperRole) -> GenerationResult<String> {
        let phase = Phase::Common;
        let identifier = self.names.resolve_entity(wrapper).map_err(integrity(phase))?;

        if let Some((first_role, first)) = self.wrappers.get(&identifier) {
            if *first_role != role || first != wrapper {
                return Err(integrity(phase)(ModelIntegrityError::IdentifierCollision {
                    first: first.describe(),
                    second: wrapper.describe(),
                    identifier,
                }));
            }
            return Ok(identifier);
        }

        if !self
            .manifest
            .append(&identifier, EntryOrigin::Bean)
            .map_err(integrity(phase))?
        {
            return Err(integrity(phase)(ModelIntegrityError::IdentifierCollision {
                first: EntryOrigin::Bean.to_string(),
                second: wrapper.describe(),
                identifier,
            }));
        }

        self.registry.record_wrapper(
            &identifier,
            WrapperDescriptor {
                role,
                element_name: wrapper.element_name.clone(),
                namespace: wrapper.element_namespace.clone(),
                property_order: wrapper.property_order(),
            },
        );
        self.wrappers.insert(identifier.clone(), (role, wrapper.clone()));

        let bean = BeanModel {
            identifier: identifier.clone(),
            element_name: wrapper.element_name.clone(),
            namespace: wrapper.element_namespace.clone(),
            properties: child_properties(self.names, &wrapper.children, Variant::Legacy)
                .map_err(integrity(phase))?,
        };
        let template = match role {
            WrapperRole::Request => TemplateId::RequestBean,
            WrapperRole::Response => TemplateId::ResponseBean,
        };
        self.emitter.emit(template, RenderData::Bean(bean))?;
        Ok(identifier)
    }

    fn fault(&mut self, fault: &ResolvedFault) -> GenerationResult<()> {
        let phase = Phase::Common;
        if fault.is_implicit {
            let appended = self
                .manifest
                .append(&fault.carrier_bean_identifier, EntryOrigin::FaultBean)
                .map_err(integrity(phase))?;
            if !appended {
                return Err(integrity(phase)(ModelIntegrityError::IdentifierCollision {
                    identifier: fault.carrier_bean_identifier.clone(),
                    first: EntryOrigin::FaultBean.to_string(),
                    second: fault.declaration.describe(),
                }));
            }
            let model = fault_model(self.names, fault, Variant::Legacy).map_err(integrity(phase))?;
            self.emitter.emit(TemplateId::FaultBean, RenderData::Fault(model))?;
        }

        self.registry.record_fault_mapping(
            &fault.fault_identifier,
            FaultMappingDescriptor {
                element_name: fault.element_name.clone(),
                namespace: fault.element_namespace.clone(),
                carrier_bean: fault.carrier_bean_identifier.clone(),
                implicit: fault.is_implicit,
            },
        );
        Ok(())
    }

    fn type_definition(&mut self, ty: &ResolvedType) -> GenerationResult<()> {
        let phase = Phase::Common;
        let model = type_model(self.names, ty, Variant::Legacy).map_err(integrity(phase))?;
        self.emitter
            .emit(TemplateId::binding_type(ty.definition.kind), RenderData::Type(model))?;

        if !ty.definition.is_abstract {
            self.manifest
                .append(&ty.identifier, EntryOrigin::Type)
                .map_err(integrity(phase))?;
        }
        Ok(())
    }
}

/// Sends requests to the renderer and collects the produced files.
struct Emitter<'r> {
    phase: Phase,
    renderer: &'r dyn Renderer,
    files: Vec<GeneratedFile>,
}

impl<'r> Emitter<'r> {
    fn new(phase: Phase, renderer: &'r dyn Renderer) -> Self {
        Self {
            phase,
            renderer,
            files: Vec::new(),
        }
    }

    fn emit(&mut self, template: TemplateId, data: RenderData) -> GenerationResult<()> {
        let request = RenderRequest::new(template, data);
        let path = self
            .renderer
            .render(self.phase, &request)
            .map_err(|source| GenerationError::Render {
                phase: self.phase,
                source,
            })?;
        debug!(
            phase = %self.phase,
            template = %template,
            identifier = request.identifier(),
            path = %path.display(),
            "rendered"
        );
        self.files.push(GeneratedFile {
            template,
            identifier: request.identifier().to_string(),
            path,
        });
        Ok(())
    }
}

fn integrity(phase: Phase) -> impl Fn(ModelIntegrityError) -> GenerationError {
    move |source| GenerationError::ModelIntegrity { phase, source }
}

fn property_model(
    names: &NameResolver,
    name: &str,
    element_name: &str,
    value_type: &TypeRef,
    repeated: bool,
    attribute: bool,
    variant: Variant,
) -> Result<PropertyModel, ModelIntegrityError> {
    let component_type = if repeated {
        Some(names.resolve_component_type(value_type, variant)?)
    } else {
        None
    };
    Ok(PropertyModel {
        name: name.to_string(),
        element_name: element_name.to_string(),
        value_type: names.resolve_value_type(value_type, repeated, variant)?,
        component_type,
        attribute,
    })
}

fn child_properties(
    names: &NameResolver,
    children: &[ChildElement],
    variant: Variant,
) -> Result<Vec<PropertyModel>, ModelIntegrityError> {
    children
        .iter()
        .map(|child| {
            property_model(
                names,
                &child.element_name,
                &child.element_name,
                &child.value_type,
                child.repeated,
                false,
                variant,
            )
        })
        .collect()
}

fn type_model(
    names: &NameResolver,
    ty: &ResolvedType,
    variant: Variant,
) -> Result<TypeModel, ModelIntegrityError> {
    let definition = &ty.definition;
    let properties = definition
        .members
        .iter()
        .map(|member| {
            property_model(
                names,
                &member.name,
                &member.element_name,
                &member.value_type,
                member.repeated,
                member.attribute,
                variant,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypeModel {
        identifier: ty.identifier.clone(),
        kind: definition.kind,
        type_name: definition.type_name.clone(),
        namespace: definition.namespace.clone(),
        is_abstract: definition.is_abstract,
        base: definition
            .base
            .as_deref()
            .map(|base| names.resolve(base))
            .transpose()?,
        properties,
        enum_values: definition.enum_values.clone(),
        value_type: definition
            .value_type
            .as_ref()
            .map(|value_type| names.resolve_value_type(value_type, false, variant))
            .transpose()?,
        root_element: ty.root_element.clone(),
    })
}

fn fault_model(
    names: &NameResolver,
    fault: &ResolvedFault,
    variant: Variant,
) -> Result<FaultModel, ModelIntegrityError> {
    let properties = match &fault.declaration.carrier {
        FaultCarrier::Implicit { children, .. } => child_properties(names, children, variant)?,
        FaultCarrier::Explicit { .. } => Vec::new(),
    };
    Ok(FaultModel {
        identifier: fault.fault_identifier.clone(),
        carrier_bean_identifier: fault.carrier_bean_identifier.clone(),
        is_implicit: fault.is_implicit,
        element_name: fault.element_name.clone(),
        namespace: fault.element_namespace.clone(),
        properties,
    })
}

fn operation_model(
    names: &NameResolver,
    resolved: &ResolvedOperation,
    variant: Variant,
) -> Result<OperationModel, ModelIntegrityError> {
    let operation = &resolved.operation;
    let parameters = operation
        .parameters
        .iter()
        .map(|parameter| {
            Ok(ParameterModel {
                name: parameter.element_name.clone(),
                value_type: names.resolve_value_type(
                    &parameter.value_type,
                    parameter.repeated,
                    variant,
                )?,
                mode: parameter.mode,
                header: parameter.header,
            })
        })
        .collect::<Result<Vec<_>, ModelIntegrityError>>()?;

    let return_type = operation
        .result
        .value_type
        .as_ref()
        .map(|value_type| names.resolve_value_type(value_type, operation.result.repeated, variant))
        .transpose()?;

    Ok(OperationModel {
        method_name: operation.name.clone(),
        operation_name: operation.operation_name.clone(),
        action: operation.action.clone(),
        one_way: operation.one_way,
        parameters,
        return_type,
        request_bean: resolved.request_bean.clone(),
        response_bean: resolved.response_bean.clone(),
        faults: resolved.faults.clone(),
    })
}

#[cfg(test)]
#[path = "orchestrator/orchestrator_tests.rs"]
mod orchestrator_tests;

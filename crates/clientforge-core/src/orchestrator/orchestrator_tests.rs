#![allow(non_snake_case)]

use super::*;
use crate::config::PackageConversionRule;
use crate::error::RenderError;
use crate::model::{
    Endpoint, EndpointGroup, Member, OperationResult, Parameter, ParameterMode, Primitive,
    RootElementDeclaration, RpcMessage, SchemaGroup, TypeKind,
};
use crate::registry::{Descriptor, DescriptorKind};
use parking_lot::Mutex;
use std::path::PathBuf;

/// Records every request and returns a path derived from the identifier.
#[derive(Default)]
struct RecordingRenderer {
    requests: Mutex<Vec<(Phase, RenderRequest)>>,
}

impl RecordingRenderer {
    fn rendered(&self, phase: Phase, template: TemplateId) -> Vec<RenderRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|(p, request)| *p == phase && request.template == template)
            .map(|(_, request)| request.clone())
            .collect()
    }

    fn count(&self, phase: Phase) -> usize {
        self.requests.lock().iter().filter(|(p, _)| *p == phase).count()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, phase: Phase, request: &RenderRequest) -> Result<PathBuf, RenderError> {
        self.requests.lock().push((phase, request.clone()));
        Ok(PathBuf::from(phase.as_str()).join(format!(
            "{}.java",
            request.identifier().replace('.', "/")
        )))
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, _phase: Phase, request: &RenderRequest) -> Result<PathBuf, RenderError> {
        Err(RenderError::Failed {
            identifier: request.identifier().to_string(),
            message: "disk full".to_string(),
        })
    }
}

const LEGACY: Phase = Phase::Variant(Variant::Legacy);
const MODERN: Phase = Phase::Variant(Variant::Modern);

fn string_child(name: &str) -> ChildElement {
    ChildElement::new(name, TypeRef::Primitive(Primitive::String))
}

fn model_with(endpoints: Vec<Endpoint>, types: Vec<TypeDefinition>) -> ServiceModel {
    let mut model = ServiceModel::default();
    if !endpoints.is_empty() {
        model
            .endpoints
            .insert("ns1".to_string(), EndpointGroup { endpoints });
    }
    if !types.is_empty() {
        model.schemas.insert(
            "ns1".to_string(),
            SchemaGroup {
                types,
                root_elements: Vec::new(),
            },
        );
    }
    model
}

fn do_thing_operation() -> Operation {
    let mut operation = Operation::new("doThing");
    operation.operation_name = "DoThing".to_string();
    operation.messages = vec![
        Message::RequestWrapper(WrapperMessage::new(
            "DoThing",
            "ns1",
            "com.x.jaxws.DoThing",
            vec![string_child("a"), string_child("b")],
        )),
        Message::ResponseWrapper(WrapperMessage::new(
            "DoThingResponse",
            "ns1",
            "com.x.jaxws.DoThingResponse",
            vec![string_child("result")],
        )),
    ];
    operation
}

fn endpoint_with(operations: Vec<Operation>) -> Endpoint {
    let mut endpoint = Endpoint::new("com.x.Things", "ThingsService", "ns1");
    endpoint.operations = operations;
    endpoint
}

fn implicit_fault(name: &str) -> FaultMessage {
    FaultMessage {
        qualified_name: Some(name.to_string()),
        element_name: "thingFault".to_string(),
        target_namespace: "ns1".to_string(),
        carrier: FaultCarrier::Implicit {
            bean_name: None,
            children: vec![string_child("reason")],
        },
    }
}

fn orchestrator(model: &ServiceModel) -> GenerationOrchestrator<'_> {
    GenerationOrchestrator::new(model, NameResolver::default(), EndpointContext::default())
}

// ============================================================================
// Wrapper operation
// ============================================================================

#[test]
fn run___wrapper_operation___manifest_holds_both_beans() {
    let model = model_with(vec![endpoint_with(vec![do_thing_operation()])], Vec::new());
    let renderer = RecordingRenderer::default();

    let output = orchestrator(&model).run(&renderer).unwrap();

    assert_eq!(
        output.common.manifest.identifiers(),
        ["com.x.jaxws.DoThing", "com.x.jaxws.DoThingResponse"]
    );
}

#[test]
fn run___wrapper_operation___records_property_order_per_bean() {
    let model = model_with(vec![endpoint_with(vec![do_thing_operation()])], Vec::new());
    let renderer = RecordingRenderer::default();

    let output = orchestrator(&model).run(&renderer).unwrap();
    let registry = &output.common.registry;

    assert_eq!(registry.property_order("com.x.jaxws.DoThing").unwrap(), ["a", "b"]);
    assert_eq!(
        registry.property_order("com.x.jaxws.DoThingResponse").unwrap(),
        ["result"]
    );
    assert_eq!(registry.entries_of(DescriptorKind::Wrapper).count(), 2);
}

#[test]
fn run___wrapper_operation___both_variants_reference_beans() {
    let model = model_with(vec![endpoint_with(vec![do_thing_operation()])], Vec::new());
    let renderer = RecordingRenderer::default();

    orchestrator(&model).run(&renderer).unwrap();

    for phase in [LEGACY, MODERN] {
        for template in [TemplateId::EndpointInterface, TemplateId::SoapEndpointImpl] {
            let requests = renderer.rendered(phase, template);
            assert_eq!(requests.len(), 1, "{phase} {template}");
            let RenderData::Endpoint(endpoint) = &requests[0].data else {
                panic!("expected endpoint data");
            };
            let operation = &endpoint.operations[0];
            assert_eq!(operation.request_bean.as_deref(), Some("com.x.jaxws.DoThing"));
            assert_eq!(
                operation.response_bean.as_deref(),
                Some("com.x.jaxws.DoThingResponse")
            );
        }
    }
}

#[test]
fn run_common___wrapper_operation___renders_request_and_response_beans() {
    let model = model_with(vec![endpoint_with(vec![do_thing_operation()])], Vec::new());
    let renderer = RecordingRenderer::default();

    let common = orchestrator(&model).run_common(&renderer).unwrap();

    assert_eq!(renderer.rendered(Phase::Common, TemplateId::RequestBean).len(), 1);
    assert_eq!(renderer.rendered(Phase::Common, TemplateId::ResponseBean).len(), 1);
    assert_eq!(common.files.len(), 2);
    assert_eq!(common.files[0].path, PathBuf::from("common/com/x/jaxws/DoThing.java"));
}

#[test]
fn run_common___operation_descriptors___are_keyed_by_method() {
    let mut operation = do_thing_operation();
    operation.one_way = true;
    operation.action = "urn:doThing".to_string();
    operation.parameters = vec![Parameter {
        element_name: "a".to_string(),
        part_name: "a".to_string(),
        header: false,
        mode: ParameterMode::In,
        value_type: TypeRef::Primitive(Primitive::String),
        repeated: false,
    }];
    let model = model_with(vec![endpoint_with(vec![operation])], Vec::new());

    let common = orchestrator(&model)
        .run_common(&RecordingRenderer::default())
        .unwrap();
    let registry = &common.registry;

    assert_eq!(
        registry.get("com.x.Things.doThing", DescriptorKind::OneWay),
        Some(&Descriptor::OneWay)
    );
    assert!(registry
        .get("com.x.Things.doThing.0", DescriptorKind::Parameter)
        .is_some());
    let Some(Descriptor::Operation(descriptor)) =
        registry.get("com.x.Things.doThing", DescriptorKind::Operation)
    else {
        panic!("missing operation descriptor");
    };
    assert_eq!(descriptor.action, "urn:doThing");
    assert_eq!(descriptor.request_wrapper.as_deref(), Some("com.x.jaxws.DoThing"));
    let Some(Descriptor::Service(service)) =
        registry.get("com.x.Things", DescriptorKind::Service)
    else {
        panic!("missing service descriptor");
    };
    assert_eq!(service.port_name, "ThingsSOAPPort");
}

// ============================================================================
// Faults
// ============================================================================

#[test]
fn run___shared_fault___renders_one_carrier_bean() {
    let mut first = Operation::new("first");
    first.messages = vec![Message::Fault(implicit_fault("com.x.ThingFault"))];
    let mut second = Operation::new("second");
    second.messages = vec![Message::Fault(implicit_fault("com.x.ThingFault"))];
    let model = model_with(vec![endpoint_with(vec![first, second])], Vec::new());
    let renderer = RecordingRenderer::default();

    let output = orchestrator(&model).run(&renderer).unwrap();

    assert_eq!(output.common.faults.len(), 1);
    assert_eq!(renderer.rendered(Phase::Common, TemplateId::FaultBean).len(), 1);
    assert_eq!(
        output.common.manifest.identifiers(),
        ["com.x.jaxws.ThingFaultBean"]
    );
    assert_eq!(renderer.rendered(LEGACY, TemplateId::WebFault).len(), 1);
    assert_eq!(renderer.rendered(MODERN, TemplateId::WebFault).len(), 1);
}

#[test]
fn run___explicit_fault___reuses_existing_type() {
    let fault = FaultMessage {
        qualified_name: Some("com.x.ThingProblem".to_string()),
        element_name: "thingProblem".to_string(),
        target_namespace: "ns1".to_string(),
        carrier: FaultCarrier::Explicit {
            type_name: "com.x.ProblemInfo".to_string(),
            element_name: "problemInfo".to_string(),
            namespace: "ns1".to_string(),
        },
    };
    let mut operation = Operation::new("run");
    operation.messages = vec![Message::Fault(fault)];
    let model = model_with(
        vec![endpoint_with(vec![operation])],
        vec![TypeDefinition::new("com.x.ProblemInfo", "ns1", TypeKind::Complex)],
    );
    let renderer = RecordingRenderer::default();

    let output = orchestrator(&model).run(&renderer).unwrap();
    let common = &output.common;

    assert!(!common.faults[0].is_implicit);
    assert_eq!(common.manifest.identifiers(), ["com.x.ProblemInfo"]);
    assert!(renderer.rendered(Phase::Common, TemplateId::FaultBean).is_empty());
    assert_eq!(
        common.registry.get("com.x.ThingProblem", DescriptorKind::FaultMapping),
        Some(&Descriptor::FaultMapping(FaultMappingDescriptor {
            element_name: "problemInfo".to_string(),
            namespace: "ns1".to_string(),
            carrier_bean: "com.x.ProblemInfo".to_string(),
            implicit: false,
        }))
    );
}

#[test]
fn run___operation_model___lists_fault_identifiers() {
    let mut operation = Operation::new("run");
    operation.messages = vec![
        Message::Fault(implicit_fault("com.x.B")),
        Message::Fault(implicit_fault("com.x.A")),
        Message::Fault(implicit_fault("com.x.B")),
    ];
    let model = model_with(vec![endpoint_with(vec![operation])], Vec::new());

    let common = orchestrator(&model)
        .run_common(&RecordingRenderer::default())
        .unwrap();

    assert_eq!(common.endpoints[0].operations[0].faults, ["com.x.B", "com.x.A"]);
}

// ============================================================================
// Empty model
// ============================================================================

#[test]
fn run___empty_model___produces_empty_results() {
    let model = ServiceModel::default();
    let renderer = RecordingRenderer::default();

    let output = orchestrator(&model).run(&renderer).unwrap();

    assert!(output.common.manifest.is_empty());
    assert!(output.common.registry.is_empty());
    assert!(output.common.files.is_empty());
    assert_eq!(output.variants.len(), 2);
    for phase in &output.variants {
        assert!(phase.files.is_empty());
        assert!(phase.registry.is_empty());
    }
    assert!(renderer.requests.lock().is_empty());
}

// ============================================================================
// Manifest
// ============================================================================

#[test]
fn run_common___manifest_length___counts_beans_and_concrete_types() {
    let mut rpc = Operation::new("lookup");
    rpc.parameters = vec![Parameter {
        element_name: "id".to_string(),
        part_name: "id".to_string(),
        header: false,
        mode: ParameterMode::In,
        value_type: TypeRef::Primitive(Primitive::Long),
        repeated: false,
    }];
    rpc.result = OperationResult {
        name: "return".to_string(),
        value_type: Some(TypeRef::Named("com.x.Item".to_string())),
        ..OperationResult::default()
    };
    rpc.messages = vec![
        Message::RpcInput(RpcMessage {
            bean_name: Some("com.x.rpc.Lookup".to_string()),
        }),
        Message::RpcOutput(RpcMessage {
            bean_name: Some("com.x.rpc.LookupResponse".to_string()),
        }),
        Message::Fault(implicit_fault("com.x.LookupFault")),
    ];
    let mut base = TypeDefinition::new("com.x.Base", "ns1", TypeKind::Complex);
    base.is_abstract = true;
    let types = vec![
        base,
        TypeDefinition::new("com.x.Item", "ns1", TypeKind::Complex),
        TypeDefinition::new("com.x.Color", "ns1", TypeKind::Enum),
    ];
    let model = model_with(
        vec![endpoint_with(vec![rpc, do_thing_operation()])],
        types,
    );

    let common = orchestrator(&model)
        .run_common(&RecordingRenderer::default())
        .unwrap();

    // 4 wrapper beans, 1 fault bean, 2 concrete types
    assert_eq!(common.manifest.len(), 7);
    assert!(!common.manifest.contains("com.x.Base"));
    assert_eq!(
        common.registry.property_order("com.x.rpc.LookupResponse").unwrap(),
        ["return"]
    );
    assert_eq!(common.registry.property_order("com.x.rpc.Lookup").unwrap(), ["id"]);
}

#[test]
fn run_common___bean_named_like_type___is_collision() {
    let mut operation = Operation::new("doThing");
    operation.messages = vec![Message::RequestWrapper(WrapperMessage::new(
        "DoThing",
        "ns1",
        "com.x.Item",
        Vec::new(),
    ))];
    let model = model_with(
        vec![endpoint_with(vec![operation])],
        vec![TypeDefinition::new("com.x.Item", "ns1", TypeKind::Complex)],
    );

    let err = orchestrator(&model)
        .run_common(&RecordingRenderer::default())
        .unwrap_err();

    assert!(matches!(
        err,
        GenerationError::ModelIntegrity {
            phase: Phase::Common,
            source: ModelIntegrityError::IdentifierCollision { .. }
        }
    ));
}

#[test]
fn run_common___shared_wrapper_bean___is_rendered_once() {
    let mut other = do_thing_operation();
    other.name = "doThingAgain".to_string();
    let model = model_with(
        vec![endpoint_with(vec![do_thing_operation(), other])],
        Vec::new(),
    );
    let renderer = RecordingRenderer::default();

    let common = orchestrator(&model).run_common(&renderer).unwrap();

    assert_eq!(common.manifest.len(), 2);
    assert_eq!(renderer.rendered(Phase::Common, TemplateId::RequestBean).len(), 1);
}

#[test]
fn run_common___distinct_wrappers_converging_on_one_bean___is_collision() {
    let mut first = Operation::new("doA");
    first.messages = vec![Message::RequestWrapper(WrapperMessage::new(
        "Do",
        "ns1",
        "com.a.jaxws.Do",
        vec![string_child("a")],
    ))];
    let mut second = Operation::new("doB");
    second.messages = vec![Message::RequestWrapper(WrapperMessage::new(
        "Do",
        "ns2",
        "com.b.jaxws.Do",
        vec![string_child("z")],
    ))];
    let model = model_with(vec![endpoint_with(vec![first, second])], Vec::new());
    let names = NameResolver::new(vec![
        PackageConversionRule::new("com.a", "com.c"),
        PackageConversionRule::new("com.b", "com.c"),
    ])
    .unwrap();
    let orchestrator = GenerationOrchestrator::new(&model, names, EndpointContext::default());
    let renderer = RecordingRenderer::default();

    let err = orchestrator.run_common(&renderer).unwrap_err();

    let GenerationError::ModelIntegrity {
        phase: Phase::Common,
        source: ModelIntegrityError::IdentifierCollision { identifier, .. },
    } = &err
    else {
        panic!("expected identifier collision, got {err:?}");
    };
    assert_eq!(identifier, "com.c.jaxws.Do");
    assert_eq!(renderer.rendered(Phase::Common, TemplateId::RequestBean).len(), 1);
}

#[test]
fn run_common___fault_carrier_named_like_wrapper_bean___is_collision() {
    let mut operation = Operation::new("boom");
    operation.messages = vec![
        Message::RequestWrapper(WrapperMessage::new(
            "Boom",
            "ns1",
            "com.x.jaxws.BoomBean",
            vec![string_child("a")],
        )),
        Message::Fault(implicit_fault("com.x.Boom")),
    ];
    let model = model_with(vec![endpoint_with(vec![operation])], Vec::new());
    let renderer = RecordingRenderer::default();

    let err = orchestrator(&model).run_common(&renderer).unwrap_err();

    let GenerationError::ModelIntegrity {
        source: ModelIntegrityError::IdentifierCollision { identifier, .. },
        ..
    } = &err
    else {
        panic!("expected identifier collision, got {err:?}");
    };
    assert_eq!(identifier, "com.x.jaxws.BoomBean");
    assert!(renderer.rendered(Phase::Common, TemplateId::FaultBean).is_empty());
}

// ============================================================================
// Types
// ============================================================================

#[test]
fn run___repeated_member___uses_variant_idiom() {
    let mut order = TypeDefinition::new("com.x.Order", "ns1", TypeKind::Complex);
    order.members = vec![Member {
        name: "quantities".to_string(),
        element_name: "quantity".to_string(),
        value_type: TypeRef::Primitive(Primitive::Int),
        repeated: true,
        attribute: false,
    }];
    let model = model_with(Vec::new(), vec![order]);
    let renderer = RecordingRenderer::default();

    orchestrator(&model).run(&renderer).unwrap();

    let member_type = |phase: Phase, template: TemplateId| {
        let requests = renderer.rendered(phase, template);
        let RenderData::Type(ty) = &requests[0].data else {
            panic!("expected type data");
        };
        (
            ty.properties[0].value_type.clone(),
            ty.properties[0].component_type.clone(),
        )
    };
    assert_eq!(
        member_type(Phase::Common, TemplateId::BindingComplexType),
        ("int[]".to_string(), Some("int".to_string()))
    );
    assert_eq!(
        member_type(LEGACY, TemplateId::ComplexType),
        ("int[]".to_string(), Some("int".to_string()))
    );
    assert_eq!(
        member_type(MODERN, TemplateId::ComplexType),
        ("java.util.List<Integer>".to_string(), Some("Integer".to_string()))
    );
}

#[test]
fn run___enum_type___dispatches_per_variant() {
    let mut color = TypeDefinition::new("com.x.Color", "ns1", TypeKind::Enum);
    color.enum_values = vec!["RED".to_string(), "GREEN".to_string()];
    let model = model_with(Vec::new(), vec![color]);
    let renderer = RecordingRenderer::default();

    orchestrator(&model).run(&renderer).unwrap();

    assert_eq!(renderer.rendered(Phase::Common, TemplateId::BindingEnumType).len(), 1);
    assert_eq!(renderer.rendered(LEGACY, TemplateId::LegacyEnumType).len(), 1);
    assert_eq!(renderer.rendered(MODERN, TemplateId::ModernEnumType).len(), 1);
}

#[test]
fn run_common___root_element___is_recorded_and_attached() {
    let mut model = model_with(
        Vec::new(),
        vec![TypeDefinition::new("com.x.Order", "ns1", TypeKind::Complex)],
    );
    model
        .schemas
        .entry("ns2".to_string())
        .or_default()
        .root_elements
        .push(RootElementDeclaration {
            name: "order".to_string(),
            namespace: "ns2".to_string(),
            qualified_name: Some("com.x.Order".to_string()),
        });

    let common = orchestrator(&model)
        .run_common(&RecordingRenderer::default())
        .unwrap();

    assert_eq!(
        common.registry.get("com.x.Order", DescriptorKind::RootElement),
        Some(&Descriptor::RootElement(RootElementDescriptor {
            name: "order".to_string(),
            namespace: "ns2".to_string(),
        }))
    );
    assert_eq!(
        common.types[0].root_element,
        Some(RootElementModel {
            name: "order".to_string(),
            namespace: "ns2".to_string(),
        })
    );
}

// ============================================================================
// Variant phases
// ============================================================================

#[test]
fn run_variant___impl_descriptors___stay_in_overlay() {
    let model = model_with(vec![endpoint_with(vec![do_thing_operation()])], Vec::new());
    let orchestrator = orchestrator(&model);
    let renderer = RecordingRenderer::default();
    let common = orchestrator.run_common(&renderer).unwrap();
    let before = common.registry.len();

    let legacy = orchestrator
        .run_variant(&common, Variant::Legacy, &renderer)
        .unwrap();

    assert_eq!(common.registry.len(), before);
    assert!(common.registry.get("com.x.ThingsImpl", DescriptorKind::Service).is_none());
    assert!(legacy.registry.get("com.x.ThingsImpl", DescriptorKind::Service).is_some());
    assert!(legacy.registry.get("com.x.ThingsImpl", DescriptorKind::SoapBinding).is_some());
    assert_eq!(legacy.registry.len(), before + 2);
}

#[test]
fn run_variant___endpoint_model___uses_context_and_conversions() {
    let model = model_with(vec![endpoint_with(vec![do_thing_operation()])], Vec::new());
    let names = NameResolver::new(vec![PackageConversionRule::new("com.x", "com.client")]).unwrap();
    let context = EndpointContext::new("https", "api.example.com", "/soap");
    let orchestrator = GenerationOrchestrator::new(&model, names, context);
    let renderer = RecordingRenderer::default();

    orchestrator.run(&renderer).unwrap();

    let requests = renderer.rendered(MODERN, TemplateId::SoapEndpointImpl);
    let RenderData::Endpoint(endpoint) = &requests[0].data else {
        panic!("expected endpoint data");
    };
    assert_eq!(endpoint.identifier, "com.client.Things");
    assert_eq!(endpoint.impl_identifier, "com.client.ThingsImpl");
    assert_eq!(endpoint.default_address, "https://api.example.com/soap/ThingsService");
    assert_eq!(requests[0].identifier(), "com.client.ThingsImpl");
}

#[test]
fn run___variants___render_same_public_surface() {
    let model = model_with(
        vec![endpoint_with(vec![do_thing_operation()])],
        vec![TypeDefinition::new("com.x.Item", "ns1", TypeKind::Complex)],
    );
    let renderer = RecordingRenderer::default();

    let output = orchestrator(&model).run(&renderer).unwrap();
    let identifiers = |variant: Variant| {
        output
            .variant(variant)
            .unwrap()
            .files
            .iter()
            .map(|file| file.identifier.clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(identifiers(Variant::Legacy), identifiers(Variant::Modern));
    assert_eq!(renderer.count(LEGACY), renderer.count(MODERN));
    assert_eq!(output.sources_for(Variant::Legacy).len(), 3 + 3);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn run___renderer_failure___reports_common_phase() {
    let model = model_with(vec![endpoint_with(vec![do_thing_operation()])], Vec::new());

    let err = orchestrator(&model).run(&FailingRenderer).unwrap_err();

    assert_eq!(err.phase(), Phase::Common);
    assert!(matches!(err, GenerationError::Render { .. }));
}

#[test]
fn run_common___endpoint_without_name___is_model_integrity_error() {
    let mut endpoint = endpoint_with(Vec::new());
    endpoint.qualified_name = None;
    let model = model_with(vec![endpoint], Vec::new());

    let err = orchestrator(&model)
        .run_common(&RecordingRenderer::default())
        .unwrap_err();

    assert!(matches!(
        err,
        GenerationError::ModelIntegrity {
            source: ModelIntegrityError::MissingQualifiedName { .. },
            ..
        }
    ));
}

#![allow(non_snake_case)]

use super::*;
use clientforge_core::model::{ParameterMode, SoapBinding};
use clientforge_core::registry::{
    DescriptorKind, FaultMappingDescriptor, OperationDescriptor, ParameterDescriptor,
    ResultDescriptor, RootElementDescriptor, ServiceDescriptor, WrapperDescriptor, WrapperRole,
};
use clientforge_core::{BindingRegistry, RecordBindings, TypeManifest};
use tempfile::TempDir;

fn run_id() -> RunId {
    RunId::parse("build-42").unwrap()
}

fn sample_manifest() -> FrozenManifest {
    FrozenManifest::from_identifiers(vec![
        "com.x.jaxws.Place".to_string(),
        "com.x.jaxws.PlaceResponse".to_string(),
        "com.x.Order".to_string(),
    ])
    .unwrap()
}

fn sample_registry() -> FrozenRegistry {
    let mut registry = BindingRegistry::new();
    registry.record_service(
        "com.x.Orders",
        ServiceDescriptor {
            name: "Orders".to_string(),
            port_name: "OrdersSOAPPort".to_string(),
            service_name: "OrdersService".to_string(),
            target_namespace: "urn:orders".to_string(),
        },
    );
    registry.record_soap_binding("com.x.Orders", SoapBinding::default());
    registry.record_operation(
        "com.x.Orders.place",
        OperationDescriptor {
            operation_name: "place".to_string(),
            action: "urn:place".to_string(),
            request_wrapper: Some("com.x.jaxws.Place".to_string()),
            response_wrapper: Some("com.x.jaxws.PlaceResponse".to_string()),
        },
    );
    registry.record_result(
        "com.x.Orders.place",
        ResultDescriptor {
            name: "return".to_string(),
            part_name: "return".to_string(),
            target_namespace: String::new(),
            header: false,
        },
    );
    registry.record_parameter(
        "com.x.Orders.place",
        0,
        ParameterDescriptor {
            name: "item".to_string(),
            part_name: "item".to_string(),
            mode: ParameterMode::InOut,
            header: true,
        },
    );
    registry.record_wrapper(
        "com.x.jaxws.Place",
        WrapperDescriptor {
            role: WrapperRole::Request,
            element_name: "place".to_string(),
            namespace: "urn:orders".to_string(),
            property_order: vec!["zeta".to_string(), "alpha".to_string(), "mid".to_string()],
        },
    );
    registry.record_fault_mapping(
        "com.x.OrderFault",
        FaultMappingDescriptor {
            element_name: "orderFault".to_string(),
            namespace: "urn:orders".to_string(),
            carrier_bean: "com.x.jaxws.OrderFaultBean".to_string(),
            implicit: true,
        },
    );
    registry.record_root_element(
        "com.x.Order",
        RootElementDescriptor {
            name: "order".to_string(),
            namespace: "urn:orders".to_string(),
        },
    );
    registry.mark_one_way("com.x.Orders.cancel");
    registry.freeze()
}

#[test]
fn MetadataPersistence___persist___names_files_after_run_id() {
    let temp = TempDir::new().unwrap();
    let persistence = MetadataPersistence::new(temp.path(), run_id());

    let artifacts = persistence
        .persist(&sample_manifest(), &sample_registry(), Variant::Legacy)
        .unwrap();

    assert_eq!(artifacts.manifest_path, temp.path().join("build-42.types"));
    assert_eq!(artifacts.bindings_path, temp.path().join("build-42.bindings.json"));
    assert!(artifacts.manifest_path.exists());
    assert!(artifacts.bindings_path.exists());
}

#[test]
fn MetadataPersistence___persist___writes_one_identifier_per_line() {
    let temp = TempDir::new().unwrap();
    let persistence = MetadataPersistence::new(temp.path(), run_id());

    let artifacts = persistence
        .persist(&sample_manifest(), &sample_registry(), Variant::Legacy)
        .unwrap();

    let content = fs::read_to_string(&artifacts.manifest_path).unwrap();
    assert_eq!(
        content,
        "com.x.jaxws.Place\ncom.x.jaxws.PlaceResponse\ncom.x.Order\n"
    );
}

#[test]
fn MetadataPersistence___round_trip___preserves_every_descriptor() {
    let temp = TempDir::new().unwrap();
    let persistence = MetadataPersistence::new(temp.path(), run_id());
    let registry = sample_registry();

    let artifacts = persistence
        .persist(&sample_manifest(), &registry, Variant::Modern)
        .unwrap();
    let loaded = load_bindings(&artifacts.bindings_path).unwrap();

    assert_eq!(loaded.registry, registry);
    assert_eq!(loaded.run_id, "build-42");
    assert_eq!(loaded.variant, Variant::Modern);
    assert_eq!(
        loaded.registry.property_order("com.x.jaxws.Place").unwrap(),
        ["zeta", "alpha", "mid"]
    );
    assert_eq!(load_manifest(&artifacts.manifest_path).unwrap(), sample_manifest());
}

#[test]
fn MetadataPersistence___empty_inputs___write_well_formed_files() {
    let temp = TempDir::new().unwrap();
    let persistence = MetadataPersistence::new(temp.path(), run_id());

    let artifacts = persistence
        .persist(
            &TypeManifest::new().freeze(),
            &BindingRegistry::new().freeze(),
            Variant::Legacy,
        )
        .unwrap();

    assert_eq!(fs::metadata(&artifacts.manifest_path).unwrap().len(), 0);
    let json: serde_json::Value =
        serde_json::from_slice(&fs::read(&artifacts.bindings_path).unwrap()).unwrap();
    assert_eq!(json["entries"], serde_json::json!([]));
    assert_eq!(json["format_version"], "1.0");
    assert!(load_manifest(&artifacts.manifest_path).unwrap().is_empty());
    assert!(load_bindings(&artifacts.bindings_path).unwrap().registry.is_empty());
}

#[test]
fn MetadataPersistence___digests___match_file_contents() {
    let temp = TempDir::new().unwrap();
    let persistence = MetadataPersistence::new(temp.path(), run_id());

    let artifacts = persistence
        .persist(&sample_manifest(), &sample_registry(), Variant::Legacy)
        .unwrap();

    assert_eq!(
        artifacts.manifest_sha256,
        compute_sha256(&fs::read(&artifacts.manifest_path).unwrap())
    );
    assert_eq!(
        artifacts.bindings_sha256,
        compute_sha256(&fs::read(&artifacts.bindings_path).unwrap())
    );
}

#[test]
fn MetadataPersistence___persist___leaves_no_temporary_files() {
    let temp = TempDir::new().unwrap();
    let persistence = MetadataPersistence::new(temp.path(), run_id());

    persistence
        .persist(&sample_manifest(), &sample_registry(), Variant::Legacy)
        .unwrap();
    persistence
        .persist(&sample_manifest(), &sample_registry(), Variant::Legacy)
        .unwrap();

    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
}

#[test]
fn MetadataPersistence___missing_destination___is_created() {
    let temp = TempDir::new().unwrap();
    let destination = temp.path().join("legacy").join("classes");
    let persistence = MetadataPersistence::new(&destination, run_id());

    let artifacts = persistence
        .persist(&sample_manifest(), &sample_registry(), Variant::Legacy)
        .unwrap();

    assert!(artifacts.manifest_path.starts_with(&destination));
}

#[test]
fn MetadataPersistence___destination_is_a_file___is_io_error() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, b"not a directory").unwrap();
    let persistence = MetadataPersistence::new(&blocker, run_id());

    let err = persistence
        .persist(&sample_manifest(), &sample_registry(), Variant::Legacy)
        .unwrap_err();

    assert!(matches!(err, PersistenceError::Io(_)));
}

#[test]
fn BindingsDocument___serde___tags_descriptor_kind() {
    let document = BindingsDocument::from_registry(&sample_registry(), &run_id(), Variant::Legacy);

    let json = serde_json::to_value(&document).unwrap();

    assert_eq!(json["variant"], "legacy");
    let first = &json["entries"][0];
    assert_eq!(first["key"], "com.x.Order");
    assert_eq!(first["descriptor"]["kind"], "root_element");
}

#[test]
fn BindingsDocument___entries___sorted_by_key_then_kind() {
    let document = BindingsDocument::from_registry(&sample_registry(), &run_id(), Variant::Legacy);

    let keys: Vec<_> = document
        .entries
        .iter()
        .map(|entry| (entry.key.as_str(), entry.descriptor.kind()))
        .collect();

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert!(keys.contains(&("com.x.Orders", DescriptorKind::SoapBinding)));
}

#[test]
fn parse_manifest___duplicate_line___is_malformed() {
    let err = parse_manifest("a.B\nc.D\na.B\n", "run.types").unwrap_err();

    assert!(matches!(err, PersistenceError::Malformed { .. }));
}

#[test]
fn parse_manifest___blank_line___is_malformed() {
    let err = parse_manifest("a.B\n\nc.D\n", "run.types").unwrap_err();

    assert!(err.to_string().contains("line 2"));
}

#[test]
fn parse_bindings___unknown_version___is_malformed() {
    let json = br#"{"format_version":"9.0","run_id":"r","variant":"legacy","entries":[]}"#;

    let err = parse_bindings(json, "run.bindings.json").unwrap_err();

    assert!(matches!(err, PersistenceError::Malformed { .. }));
}

#[test]
fn parse_bindings___duplicate_slot___is_malformed() {
    let json = br#"{"format_version":"1.0","run_id":"r","variant":"modern","entries":[
        {"key":"a.B.run","descriptor":{"kind":"one_way"}},
        {"key":"a.B.run","descriptor":{"kind":"one_way"}}
    ]}"#;

    let err = parse_bindings(json, "run.bindings.json").unwrap_err();

    assert!(err.to_string().contains("duplicate one-way descriptor"));
}

#[test]
fn parse_bindings___invalid_json___is_json_error() {
    let err = parse_bindings(b"{", "run.bindings.json").unwrap_err();

    assert!(matches!(err, PersistenceError::Json(_)));
}

//! Java source generation from render requests.
//!
//! Common artifacts must compile in both variants, so they stay within the
//! pre-generics subset of the language: no annotations, enums or generics.

use super::naming::{
    boxed_primitive, capitalize, constant_name, java_identifier, simple_name, split_identifier,
    string_literal,
};
use clientforge_core::model::{ParameterMode, TypeKind};
use clientforge_core::render::{
    BeanModel, EndpointModel, FaultModel, OperationModel, PropertyModel, RenderData, TypeModel,
};
use clientforge_core::{RenderError, RenderRequest, TemplateId};

/// Suffix of the companion class a binding-type artifact renders into.
pub const BINDING_CLASS_SUFFIX: &str = "Binding";

/// A generated compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaSource {
    pub package: String,
    pub class_name: String,
    pub code: String,
}

impl JavaSource {
    /// Path of the unit relative to a source root.
    pub fn relative_path(&self) -> String {
        if self.package.is_empty() {
            format!("{}.java", self.class_name)
        } else {
            format!("{}/{}.java", self.package.replace('.', "/"), self.class_name)
        }
    }
}

/// Generate the Java source for a render request.
pub fn generate_java(request: &RenderRequest) -> Result<JavaSource, RenderError> {
    let identifier = request.identifier();
    let (package, simple) = split_identifier(identifier);

    let (class_name, body) = match (&request.template, &request.data) {
        (TemplateId::RequestBean, RenderData::Bean(bean)) => {
            (simple.to_string(), bean_class(simple, bean, "Request"))
        }
        (TemplateId::ResponseBean, RenderData::Bean(bean)) => {
            (simple.to_string(), bean_class(simple, bean, "Response"))
        }
        (TemplateId::FaultBean, RenderData::Fault(fault)) => {
            (simple.to_string(), fault_bean_class(simple, fault))
        }
        (
            TemplateId::BindingEnumType
            | TemplateId::BindingSimpleType
            | TemplateId::BindingComplexType,
            RenderData::Type(ty),
        ) => {
            let class_name = format!("{simple}{BINDING_CLASS_SUFFIX}");
            let body = binding_class(&class_name, ty);
            (class_name, body)
        }
        (TemplateId::EndpointInterface, RenderData::Endpoint(endpoint)) => {
            (simple.to_string(), endpoint_interface(simple, endpoint))
        }
        (TemplateId::SoapEndpointImpl, RenderData::Endpoint(endpoint)) => {
            (simple.to_string(), endpoint_impl(simple, endpoint))
        }
        (TemplateId::WebFault, RenderData::Fault(fault)) => {
            (simple.to_string(), web_fault_class(simple, fault))
        }
        (TemplateId::LegacyEnumType, RenderData::Type(ty)) => {
            (simple.to_string(), legacy_enum_class(simple, ty))
        }
        (TemplateId::ModernEnumType, RenderData::Type(ty)) => {
            (simple.to_string(), modern_enum_class(simple, ty))
        }
        (TemplateId::SimpleType, RenderData::Type(ty)) => {
            (simple.to_string(), simple_type_class(simple, ty))
        }
        (TemplateId::ComplexType, RenderData::Type(ty)) => {
            (simple.to_string(), complex_type_class(simple, ty))
        }
        (template, _) => {
            return Err(RenderError::Failed {
                identifier: identifier.to_string(),
                message: format!("{template} cannot render this kind of data"),
            });
        }
    };

    let mut code = String::new();
    code.push_str("// Generated by clientforge. Do not edit.\n");
    if !package.is_empty() {
        code.push_str(&format!("package {package};\n"));
    }
    code.push('\n');
    code.push_str(&body);

    Ok(JavaSource {
        package: package.to_string(),
        class_name,
        code,
    })
}

fn doc(code: &mut String, indent: &str, lines: &[String]) {
    code.push_str(&format!("{indent}/**\n"));
    for line in lines {
        code.push_str(&format!("{indent} * {line}\n"));
    }
    code.push_str(&format!("{indent} */\n"));
}

fn qname(namespace: &str, local: &str) -> String {
    format!("{{{namespace}}}{local}")
}

fn string_constant(code: &mut String, name: &str, value: &str) {
    code.push_str(&format!(
        "    public static final String {name} = {};\n",
        string_literal(value)
    ));
}

fn string_array_constant<'a>(code: &mut String, name: &str, values: impl Iterator<Item = &'a str>) {
    let literals: Vec<String> = values.map(string_literal).collect();
    code.push_str(&format!(
        "    public static final String[] {name} = {{ {} }};\n",
        literals.join(", ")
    ));
}

/// Accessor suffix of a property, e.g. `OrderId` for `orderId`.
fn accessor_suffix(name: &str) -> String {
    let field = java_identifier(name);
    let trimmed = field.trim_start_matches('_');
    if trimmed.is_empty() {
        capitalize(&field)
    } else {
        capitalize(trimmed)
    }
}

/// Fields, getters and setters of a property list.
fn properties(code: &mut String, properties: &[PropertyModel]) {
    if !properties.is_empty() {
        code.push('\n');
    }
    for property in properties {
        let field = java_identifier(&property.name);
        code.push_str(&format!("    private {} {field};\n", property.value_type));
    }

    for property in properties {
        let field = java_identifier(&property.name);
        let suffix = accessor_suffix(&property.name);
        let value_type = &property.value_type;

        code.push('\n');
        let kind = if property.attribute { "attribute" } else { "element" };
        doc(code, "    ", &[format!("The {kind} '{}'.", property.element_name)]);
        code.push_str(&format!("    public {value_type} get{suffix}() {{\n"));
        code.push_str(&format!("        return this.{field};\n"));
        code.push_str("    }\n\n");
        code.push_str(&format!(
            "    public void set{suffix}({value_type} {field}) {{\n"
        ));
        code.push_str(&format!("        this.{field} = {field};\n"));
        code.push_str("    }\n");
    }
}

fn bean_class(simple: &str, bean: &BeanModel, role: &str) -> String {
    let mut code = String::new();
    doc(
        &mut code,
        "",
        &[format!(
            "{role} bean for {}.",
            qname(&bean.namespace, &bean.element_name)
        )],
    );
    code.push_str(&format!(
        "public class {simple} implements java.io.Serializable {{\n\n"
    ));
    string_constant(&mut code, "ELEMENT_NAME", &bean.element_name);
    string_constant(&mut code, "NAMESPACE", &bean.namespace);
    properties(&mut code, &bean.properties);
    code.push_str("}\n");
    code
}

fn fault_bean_class(simple: &str, fault: &FaultModel) -> String {
    let mut code = String::new();
    doc(
        &mut code,
        "",
        &[
            format!("Fault bean for {}.", qname(&fault.namespace, &fault.element_name)),
            String::new(),
            format!("Carries the details of {{@link {}}}.", fault.identifier),
        ],
    );
    code.push_str(&format!(
        "public class {simple} implements java.io.Serializable {{\n\n"
    ));
    string_constant(&mut code, "ELEMENT_NAME", &fault.element_name);
    string_constant(&mut code, "NAMESPACE", &fault.namespace);
    properties(&mut code, &fault.properties);
    code.push_str("}\n");
    code
}

fn binding_class(class_name: &str, ty: &TypeModel) -> String {
    let mut code = String::new();
    doc(
        &mut code,
        "",
        &[format!(
            "Binding metadata of {}, bound to {{@link {}}}.",
            qname(&ty.namespace, &ty.type_name),
            ty.identifier
        )],
    );
    code.push_str(&format!("public final class {class_name} {{\n\n"));
    string_constant(&mut code, "TYPE_NAME", &ty.type_name);
    string_constant(&mut code, "NAMESPACE", &ty.namespace);
    match &ty.root_element {
        Some(root) => {
            string_constant(&mut code, "ROOT_ELEMENT_NAME", &root.name);
            string_constant(&mut code, "ROOT_ELEMENT_NAMESPACE", &root.namespace);
        }
        None => {
            code.push_str("    public static final String ROOT_ELEMENT_NAME = null;\n");
            code.push_str("    public static final String ROOT_ELEMENT_NAMESPACE = null;\n");
        }
    }
    match ty.kind {
        TypeKind::Complex => {
            string_array_constant(
                &mut code,
                "ELEMENTS",
                ty.properties
                    .iter()
                    .filter(|p| !p.attribute)
                    .map(|p| p.element_name.as_str()),
            );
            string_array_constant(
                &mut code,
                "ATTRIBUTES",
                ty.properties
                    .iter()
                    .filter(|p| p.attribute)
                    .map(|p| p.element_name.as_str()),
            );
        }
        TypeKind::Enum => {
            string_array_constant(&mut code, "VALUES", ty.enum_values.iter().map(String::as_str));
        }
        TypeKind::Simple => {}
    }
    code.push_str(&format!("\n    private {class_name}() {{\n    }}\n"));
    code.push_str("}\n");
    code
}

fn parameter_list(operation: &OperationModel) -> String {
    operation
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.value_type, java_identifier(&p.name)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn throws_clause(operation: &OperationModel) -> String {
    if operation.faults.is_empty() {
        String::new()
    } else {
        format!(" throws {}", operation.faults.join(", "))
    }
}

fn method_signature(operation: &OperationModel) -> String {
    format!(
        "{} {}({}){}",
        operation.return_type.as_deref().unwrap_or("void"),
        java_identifier(&operation.method_name),
        parameter_list(operation),
        throws_clause(operation)
    )
}

fn mode_name(mode: ParameterMode) -> &'static str {
    match mode {
        ParameterMode::In => "in",
        ParameterMode::Out => "out",
        ParameterMode::InOut => "inout",
    }
}

fn endpoint_interface(simple: &str, endpoint: &EndpointModel) -> String {
    let mut code = String::new();
    doc(
        &mut code,
        "",
        &[format!(
            "Client interface of {} (port type {}).",
            qname(&endpoint.target_namespace, &endpoint.service_name),
            endpoint.port_type_name
        )],
    );
    code.push_str(&format!("public interface {simple} {{\n"));

    for operation in &endpoint.operations {
        code.push('\n');
        let mut lines = vec![format!("Operation '{}'.", operation.operation_name)];
        if operation.one_way {
            lines.push("One-way: the service sends no response.".to_string());
        }
        for parameter in &operation.parameters {
            let header = if parameter.header { ", header" } else { "" };
            lines.push(format!(
                "@param {} ({}{header})",
                java_identifier(&parameter.name),
                mode_name(parameter.mode)
            ));
        }
        doc(&mut code, "    ", &lines);
        code.push_str(&format!("    {};\n", method_signature(operation)));
    }

    code.push_str("}\n");
    code
}

/// Argument expression for an `Object[]`, boxing primitives by hand.
fn boxed_argument(value_type: &str, name: &str) -> String {
    match boxed_primitive(value_type) {
        Some((boxed, _)) => format!("new {boxed}({name})"),
        None => name.to_string(),
    }
}

fn endpoint_impl(simple: &str, endpoint: &EndpointModel) -> String {
    let interface = simple_name(&endpoint.identifier);
    let mut code = String::new();
    doc(
        &mut code,
        "",
        &[
            format!("SOAP implementation of {{@link {}}}.", endpoint.identifier),
            String::new(),
            "Subclasses bind a transport by overriding {@link #invoke}.".to_string(),
        ],
    );
    code.push_str(&format!("public class {simple} implements {interface} {{\n\n"));
    string_constant(&mut code, "DEFAULT_ADDRESS", &endpoint.default_address);
    string_constant(&mut code, "SERVICE_NAME", &endpoint.service_name);
    string_constant(&mut code, "PORT_NAME", &endpoint.port_name);
    string_constant(&mut code, "NAMESPACE", &endpoint.target_namespace);

    code.push_str("\n    private String address;\n\n");
    code.push_str(&format!("    public {simple}() {{\n"));
    code.push_str("        this(DEFAULT_ADDRESS);\n");
    code.push_str("    }\n\n");
    code.push_str(&format!("    public {simple}(String address) {{\n"));
    code.push_str("        this.address = address;\n");
    code.push_str("    }\n\n");
    code.push_str("    public String getAddress() {\n");
    code.push_str("        return this.address;\n");
    code.push_str("    }\n\n");
    code.push_str("    public void setAddress(String address) {\n");
    code.push_str("        this.address = address;\n");
    code.push_str("    }\n");

    for operation in &endpoint.operations {
        let arguments = if operation.parameters.is_empty() {
            "new Object[0]".to_string()
        } else {
            let items: Vec<String> = operation
                .parameters
                .iter()
                .map(|p| boxed_argument(&p.value_type, &java_identifier(&p.name)))
                .collect();
            format!("new Object[] {{ {} }}", items.join(", "))
        };
        let call = format!(
            "invoke({}, {}, {arguments})",
            string_literal(&operation.operation_name),
            string_literal(&operation.action)
        );

        code.push('\n');
        code.push_str(&format!("    public {} {{\n", method_signature(operation)));
        match operation.return_type.as_deref() {
            None => code.push_str(&format!("        {call};\n")),
            Some(return_type) => match boxed_primitive(return_type) {
                Some((boxed, unbox)) => code.push_str(&format!(
                    "        return (({boxed}) {call}).{unbox}();\n"
                )),
                None => code.push_str(&format!("        return ({return_type}) {call};\n")),
            },
        }
        code.push_str("    }\n");
    }

    code.push('\n');
    doc(
        &mut code,
        "    ",
        &["Send an operation to the service endpoint.".to_string()],
    );
    code.push_str(
        "    protected Object invoke(String operationName, String action, Object[] arguments) {\n",
    );
    code.push_str(
        "        throw new UnsupportedOperationException(\"no transport bound for \" + operationName + \" at \" + this.address);\n",
    );
    code.push_str("    }\n");
    code.push_str("}\n");
    code
}

fn web_fault_class(simple: &str, fault: &FaultModel) -> String {
    let info = &fault.carrier_bean_identifier;
    let mut code = String::new();
    doc(
        &mut code,
        "",
        &[format!(
            "Fault {}.",
            qname(&fault.namespace, &fault.element_name)
        )],
    );
    code.push_str(&format!("public class {simple} extends Exception {{\n\n"));
    string_constant(&mut code, "ELEMENT_NAME", &fault.element_name);
    string_constant(&mut code, "NAMESPACE", &fault.namespace);
    code.push_str(&format!("\n    private {info} faultInfo;\n\n"));
    code.push_str(&format!(
        "    public {simple}(String message, {info} faultInfo) {{\n"
    ));
    code.push_str("        super(message);\n");
    code.push_str("        this.faultInfo = faultInfo;\n");
    code.push_str("    }\n\n");
    code.push_str(&format!(
        "    public {simple}(String message, {info} faultInfo, Throwable cause) {{\n"
    ));
    code.push_str("        super(message, cause);\n");
    code.push_str("        this.faultInfo = faultInfo;\n");
    code.push_str("    }\n\n");
    code.push_str(&format!("    public {info} getFaultInfo() {{\n"));
    code.push_str("        return this.faultInfo;\n");
    code.push_str("    }\n");
    code.push_str("}\n");
    code
}

fn type_doc(code: &mut String, ty: &TypeModel) {
    let mut lines = vec![format!("Schema type {}.", qname(&ty.namespace, &ty.type_name))];
    if let Some(root) = &ty.root_element {
        lines.push(format!(
            "Bound to root element {}.",
            qname(&root.namespace, &root.name)
        ));
    }
    doc(code, "", &lines);
}

fn legacy_enum_class(simple: &str, ty: &TypeModel) -> String {
    let mut code = String::new();
    type_doc(&mut code, ty);
    code.push_str(&format!(
        "public final class {simple} implements java.io.Serializable {{\n\n"
    ));
    let constants: Vec<String> = ty.enum_values.iter().map(|v| constant_name(v)).collect();
    for (constant, value) in constants.iter().zip(&ty.enum_values) {
        code.push_str(&format!(
            "    public static final {simple} {constant} = new {simple}({});\n",
            string_literal(value)
        ));
    }
    code.push_str(&format!(
        "\n    private static final {simple}[] VALUES = {{ {} }};\n\n",
        constants.join(", ")
    ));
    code.push_str("    private final String value;\n\n");
    code.push_str(&format!("    private {simple}(String value) {{\n"));
    code.push_str("        this.value = value;\n");
    code.push_str("    }\n\n");
    code.push_str("    public String value() {\n");
    code.push_str("        return this.value;\n");
    code.push_str("    }\n\n");
    code.push_str(&format!(
        "    public static {simple} fromValue(String value) {{\n"
    ));
    code.push_str("        for (int i = 0; i < VALUES.length; i++) {\n");
    code.push_str("            if (VALUES[i].value.equals(value)) {\n");
    code.push_str("                return VALUES[i];\n");
    code.push_str("            }\n");
    code.push_str("        }\n");
    code.push_str("        throw new IllegalArgumentException(value);\n");
    code.push_str("    }\n\n");
    code.push_str("    public String toString() {\n");
    code.push_str("        return this.value;\n");
    code.push_str("    }\n");
    code.push_str("}\n");
    code
}

fn modern_enum_class(simple: &str, ty: &TypeModel) -> String {
    let mut code = String::new();
    type_doc(&mut code, ty);
    code.push_str(&format!("public enum {simple} {{\n\n"));
    let constants: Vec<String> = ty
        .enum_values
        .iter()
        .map(|value| format!("    {}({})", constant_name(value), string_literal(value)))
        .collect();
    code.push_str(&constants.join(",\n"));
    code.push_str(";\n\n");
    code.push_str("    private final String value;\n\n");
    code.push_str(&format!("    {simple}(String value) {{\n"));
    code.push_str("        this.value = value;\n");
    code.push_str("    }\n\n");
    code.push_str("    public String value() {\n");
    code.push_str("        return this.value;\n");
    code.push_str("    }\n\n");
    code.push_str(&format!(
        "    public static {simple} fromValue(String value) {{\n"
    ));
    code.push_str(&format!("        for ({simple} candidate : values()) {{\n"));
    code.push_str("            if (candidate.value.equals(value)) {\n");
    code.push_str("                return candidate;\n");
    code.push_str("            }\n");
    code.push_str("        }\n");
    code.push_str("        throw new IllegalArgumentException(value);\n");
    code.push_str("    }\n");
    code.push_str("}\n");
    code
}

fn simple_type_class(simple: &str, ty: &TypeModel) -> String {
    let value_type = ty.value_type.as_deref().unwrap_or("String");
    let mut code = String::new();
    type_doc(&mut code, ty);
    code.push_str(&format!(
        "public class {simple} implements java.io.Serializable {{\n\n"
    ));
    code.push_str(&format!("    private {value_type} value;\n\n"));
    code.push_str(&format!("    public {simple}() {{\n    }}\n\n"));
    code.push_str(&format!("    public {simple}({value_type} value) {{\n"));
    code.push_str("        this.value = value;\n");
    code.push_str("    }\n\n");
    code.push_str(&format!("    public {value_type} getValue() {{\n"));
    code.push_str("        return this.value;\n");
    code.push_str("    }\n\n");
    code.push_str(&format!("    public void setValue({value_type} value) {{\n"));
    code.push_str("        this.value = value;\n");
    code.push_str("    }\n");
    code.push_str("}\n");
    code
}

fn complex_type_class(simple: &str, ty: &TypeModel) -> String {
    let mut code = String::new();
    type_doc(&mut code, ty);
    let modifier = if ty.is_abstract { "abstract " } else { "" };
    let extends = ty
        .base
        .as_deref()
        .map(|base| format!(" extends {base}"))
        .unwrap_or_default();
    code.push_str(&format!(
        "public {modifier}class {simple}{extends} implements java.io.Serializable {{\n"
    ));
    properties(&mut code, &ty.properties);
    code.push_str("}\n");
    code
}

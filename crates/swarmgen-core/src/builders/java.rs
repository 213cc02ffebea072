//! Java (JAX-RS + Jackson) context builder.
//!
//! Turns model entities into the flat, pre-escaped values the Thorntail
//! templates print: Java type names with their imports, annotation literals,
//! and sanitized Javadoc lines.

// Internal imports (std, crate)
use std::collections::BTreeSet;

use super::ContextBuilder;
use crate::{
    model::{DataType, DataTypeKind, GenerationModel, Operation, Primitive, Resource, TypeRef},
    naming::{accessor_suffix, java_constant_name, package_path},
    settings::ProjectSettings,
};

// External imports (alphabetized)
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

pub const THORNTAIL_VERSION: &str = "2.7.0.Final";
pub const JACKSON_VERSION: &str = "2.9.10";
const FALLBACK_MAVEN_VERSION: &str = "1.0.0-SNAPSHOT";

const JACKSON: &str = "com.fasterxml.jackson.annotation";

/// A Java type as written in source, with the imports it needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JavaType {
    pub name: String,
    pub imports: BTreeSet<String>,
}

impl JavaType {
    fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            imports: BTreeSet::new(),
        }
    }

    fn imported(name: &str, import: &str) -> Self {
        Self {
            name: name.to_string(),
            imports: BTreeSet::from([import.to_string()]),
        }
    }
}

/// Map a model type reference to a Java type.
pub fn java_type(type_ref: &TypeRef, model_package: &str) -> JavaType {
    match type_ref {
        TypeRef::Primitive { primitive, format } => {
            let format = format.as_deref().unwrap_or("");
            match (primitive, format) {
                (Primitive::String, "date") => JavaType::imported("LocalDate", "java.time.LocalDate"),
                (Primitive::String, "date-time") => {
                    JavaType::imported("OffsetDateTime", "java.time.OffsetDateTime")
                }
                (Primitive::String, "uuid") => JavaType::imported("UUID", "java.util.UUID"),
                (Primitive::String, "byte" | "binary") => JavaType::plain("byte[]"),
                (Primitive::String, _) => JavaType::plain("String"),
                (Primitive::Integer, "int64") => JavaType::plain("Long"),
                (Primitive::Integer, _) => JavaType::plain("Integer"),
                (Primitive::Number, "float") => JavaType::plain("Float"),
                (Primitive::Number, _) => JavaType::plain("Double"),
                (Primitive::Boolean, _) => JavaType::plain("Boolean"),
            }
        }
        TypeRef::Named { name, .. } => {
            JavaType::imported(name, &format!("{}.{}", model_package, name))
        }
        TypeRef::Array { items } => {
            let mut inner = java_type(items, model_package);
            inner.name = format!("List<{}>", inner.name);
            inner.imports.insert("java.util.List".to_string());
            inner
        }
        TypeRef::Map { values } => {
            let mut inner = java_type(values, model_package);
            inner.name = format!("Map<String, {}>", inner.name);
            inner.imports.insert("java.util.Map".to_string());
            inner
        }
        TypeRef::Any => JavaType::plain("Object"),
    }
}

/// Quote and escape a string as a Java string literal.
pub fn java_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape text for an XML element body or attribute.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Split free text into lines that are safe inside a `/** ... */` comment.
pub fn javadoc_lines(text: &str) -> Vec<String> {
    let sanitized = text
        .replace("*/", "*&#47;")
        .replace('\\', "&#92;")
        .replace('\r', "");
    let mut lines: Vec<String> = sanitized
        .lines()
        .map(|l| l.trim_end().to_string())
        .collect();
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Flatten text for a `//` line comment.
///
/// Backslashes are doubled so no `\uXXXX` escape survives into the source.
pub fn comment_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace(['\r', '\n'], " ")
}

#[derive(Debug, Serialize)]
struct ResourceContext {
    class_name: String,
    path: String,
    package: String,
    imports: Vec<String>,
    javadoc: Vec<String>,
    operations: Vec<OperationContext>,
}

#[derive(Debug, Serialize)]
struct OperationContext {
    method_name: String,
    http_method: String,
    /// Method-level `@Path`, relative to the resource
    sub_path: Option<String>,
    /// Media type literals for `@Produces`
    produces: Vec<String>,
    /// Media type literals for `@Consumes`
    consumes: Vec<String>,
    return_type: String,
    /// Rendered method arguments (`@PathParam("id") Long id`)
    arguments: Vec<String>,
    javadoc: Vec<String>,
    deprecated: bool,
    diagnostics: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DataTypeContext {
    class_name: String,
    package: String,
    /// `object`, `enum` or `placeholder`
    kind: &'static str,
    source: String,
    imports: Vec<String>,
    javadoc: Vec<String>,
    fields: Vec<FieldContext>,
    constants: Vec<ConstantContext>,
    /// Boxed Java type of enum constants
    enum_type: String,
    reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct FieldContext {
    field_name: String,
    /// Arguments of `@JsonProperty`
    json_property: String,
    wire_literal: String,
    java_type: String,
    getter: String,
    setter: String,
    javadoc: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ConstantContext {
    name: String,
    literal: String,
}

fn operation_javadoc(op: &Operation) -> Vec<String> {
    let mut lines = op.summary.as_deref().map(javadoc_lines).unwrap_or_default();
    if let Some(description) = op.description.as_deref() {
        let description = javadoc_lines(description);
        if !description.is_empty() && !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(description);
    }
    if lines.is_empty() {
        lines = javadoc_lines(&format!("{} {}", op.method, op.path));
    }
    lines
}

/// Method-level path relative to the resource base path.
fn sub_path(resource_path: &str, op_path: &str) -> Option<String> {
    let relative = op_path
        .strip_prefix(resource_path.trim_end_matches('/'))
        .unwrap_or(op_path);
    match relative {
        "" | "/" => None,
        rel => Some(rel.to_string()),
    }
}

fn operation_context(
    resource: &Resource,
    op: &Operation,
    model_package: &str,
    imports: &mut BTreeSet<String>,
) -> OperationContext {
    let mut arguments = Vec::with_capacity(op.parameters.len() + 1);
    for param in &op.parameters {
        let ty = java_type(&param.type_ref, model_package);
        let annotation = param.location.annotation();
        imports.insert(format!("javax.ws.rs.{}", annotation));
        imports.extend(ty.imports);
        arguments.push(format!(
            "@{}({}) {} {}",
            annotation,
            java_string_literal(&param.name),
            ty.name,
            param.field_name
        ));
    }

    if let Some(body) = &op.request_body {
        let ty = java_type(&body.type_ref, model_package);
        imports.extend(ty.imports);
        let mut name = "body".to_string();
        let mut counter = 2;
        while op.parameters.iter().any(|p| p.field_name == name) {
            name = format!("body{}", counter);
            counter += 1;
        }
        arguments.push(format!("{} {}", ty.name, name));
    }

    let return_type = match op.response.as_ref().and_then(|r| r.type_ref.as_ref()) {
        Some(type_ref) => {
            let ty = java_type(type_ref, model_package);
            imports.extend(ty.imports);
            ty.name
        }
        None => "void".to_string(),
    };

    let produces: Vec<String> = op.produces.iter().map(|m| java_string_literal(m)).collect();
    let consumes: Vec<String> = if op.request_body.is_some() {
        op.consumes.iter().map(|m| java_string_literal(m)).collect()
    } else {
        Vec::new()
    };
    if !produces.is_empty() {
        imports.insert("javax.ws.rs.Produces".to_string());
    }
    if !consumes.is_empty() {
        imports.insert("javax.ws.rs.Consumes".to_string());
    }
    imports.insert(format!("javax.ws.rs.{}", op.method.as_str()));

    let sub_path = sub_path(&resource.path, &op.path);
    if sub_path.is_some() {
        imports.insert("javax.ws.rs.Path".to_string());
    }

    OperationContext {
        method_name: op.method_name.clone(),
        http_method: op.method.as_str().to_string(),
        sub_path,
        produces,
        consumes,
        return_type,
        arguments,
        javadoc: operation_javadoc(op),
        deprecated: op.deprecated,
        diagnostics: op.diagnostics.iter().map(|d| comment_text(d)).collect(),
    }
}

/// Boxed Java type for numeric enum constants, when every value parses as one.
fn numeric_enum_type(value_type: &TypeRef, values: &[String]) -> Option<&'static str> {
    let TypeRef::Primitive { primitive, format } = value_type else {
        return None;
    };
    let java = match (primitive, format.as_deref()) {
        (Primitive::Integer, Some("int64")) => "Long",
        (Primitive::Integer, _) => "Integer",
        (Primitive::Number, Some("float")) => "Float",
        (Primitive::Number, _) => "Double",
        _ => return None,
    };
    let parses = |v: &String| match java {
        "Integer" => v.parse::<i32>().is_ok(),
        "Long" => v.parse::<i64>().is_ok(),
        _ => v.parse::<f64>().is_ok_and(f64::is_finite),
    };
    values.iter().all(parses).then_some(java)
}

/// Java literal for a numeric enum constant of the given boxed type.
fn numeric_literal(value: &str, java: &str) -> String {
    match java {
        "Long" => format!("{}L", value),
        "Float" => format!("{}F", value),
        "Double" => format!("{}D", value),
        _ => value.to_string(),
    }
}

/// Maven needs a non-blank version without whitespace
fn maven_version(version: &str) -> String {
    let version = version.trim();
    if version.is_empty() || version.contains(char::is_whitespace) {
        FALLBACK_MAVEN_VERSION.to_string()
    } else {
        version.to_string()
    }
}

/// The JSON contract shipped in `META-INF/api-contract.json`.
pub fn contract(model: &GenerationModel, settings: &ProjectSettings) -> JsonValue {
    let model_package = settings.model_package();
    let type_name = |t: &TypeRef| java_type(t, &model_package).name;

    let resources: Vec<JsonValue> = model
        .resources
        .iter()
        .map(|resource| {
            let operations: Vec<JsonValue> = resource
                .operations
                .iter()
                .map(|op| {
                    json!({
                        "operationId": op.operation_id,
                        "method": op.method.as_str(),
                        "path": op.path,
                        "summary": op.summary,
                        "deprecated": op.deprecated,
                        "parameters": op.parameters.iter().map(|p| json!({
                            "name": p.name,
                            "in": p.location,
                            "required": p.required,
                            "type": type_name(&p.type_ref),
                        })).collect::<Vec<_>>(),
                        "requestBody": op.request_body.as_ref().map(|b| json!({
                            "mediaType": b.media_type,
                            "required": b.required,
                            "type": type_name(&b.type_ref),
                        })),
                        "response": op.response.as_ref().map(|r| json!({
                            "status": r.status,
                            "mediaType": r.media_type,
                            "type": r.type_ref.as_ref().map(|t| type_name(t)),
                        })),
                    })
                })
                .collect();
            json!({
                "name": resource.name,
                "className": format!("{}.{}", settings.rest_package(), resource.class_name),
                "path": resource.path,
                "operations": operations,
            })
        })
        .collect();

    let types: Vec<JsonValue> = model
        .data_types
        .iter()
        .map(|dt| {
            let mut entry = json!({
                "name": dt.name,
                "className": format!("{}.{}", model_package, dt.name),
                "source": dt.source,
            });
            match &dt.kind {
                DataTypeKind::Object { fields } => {
                    entry["kind"] = json!("object");
                    entry["fields"] = fields
                        .iter()
                        .map(|f| {
                            json!({
                                "name": f.name,
                                "field": f.field_name,
                                "type": type_name(&f.type_ref),
                                "required": f.required,
                            })
                        })
                        .collect();
                }
                DataTypeKind::Enum { values, value_type } => {
                    entry["kind"] = json!("enum");
                    entry["valueType"] = json!(type_name(value_type));
                    entry["values"] = json!(values);
                }
                DataTypeKind::Placeholder { reason } => {
                    entry["kind"] = json!("placeholder");
                    entry["reason"] = json!(reason);
                }
            }
            entry
        })
        .collect();

    json!({
        "project": {
            "title": model.project.title,
            "version": model.project.version,
            "description": model.project.description,
            "groupId": settings.group_id,
            "artifactId": settings.artifact_id,
            "basePackage": settings.base_package,
            "basePath": model.project.base_path,
        },
        "resources": resources,
        "types": types,
        "diagnostics": model.diagnostics,
    })
}

#[derive(Debug, Clone, Default)]
pub struct JavaContextBuilder;

impl ContextBuilder for JavaContextBuilder {
    fn project(
        &self,
        model: &GenerationModel,
        settings: &ProjectSettings,
    ) -> crate::Result<JsonValue> {
        let mut javadoc = javadoc_lines(&format!("JAX-RS application for {}.", model.project.title));
        if let Some(description) = model.project.description.as_deref() {
            let description = javadoc_lines(description);
            if !description.is_empty() {
                javadoc.push(String::new());
                javadoc.extend(description);
            }
        }

        let contract = serde_json::to_string_pretty(&contract(model, settings))?;

        Ok(json!({
            "project": {
                "name": model.project.name,
                "title": model.project.title,
                "version": model.project.version,
                "description": model.project.description,
            },
            "group_id": settings.group_id,
            "artifact_id": settings.artifact_id,
            "maven_version": maven_version(&model.project.version),
            "base_package": settings.base_package,
            "rest_package": settings.rest_package(),
            "model_package": settings.model_package(),
            "package_path": package_path(&settings.base_package),
            "app_path": model.project.base_path,
            "javadoc": javadoc,
            "thorntail_version": THORNTAIL_VERSION,
            "jackson_version": JACKSON_VERSION,
            "resources": model.resources.iter().map(|r| json!({
                "class_name": r.class_name,
                "path": r.path,
                "operation_count": r.operations.len(),
            })).collect::<Vec<_>>(),
            "data_types": model.data_types.iter().map(|dt| json!({ "name": dt.name })).collect::<Vec<_>>(),
            "diagnostics": model.diagnostics,
            "contract": contract,
        }))
    }

    fn resource(
        &self,
        resource: &Resource,
        settings: &ProjectSettings,
    ) -> crate::Result<JsonValue> {
        let model_package = settings.model_package();
        let mut imports: BTreeSet<String> = BTreeSet::from([
            "javax.ws.rs.Path".to_string(),
            "javax.ws.rs.WebApplicationException".to_string(),
            "javax.ws.rs.core.Response".to_string(),
        ]);
        let operations = resource
            .operations
            .iter()
            .map(|op| operation_context(resource, op, &model_package, &mut imports))
            .collect();

        let context = ResourceContext {
            class_name: resource.class_name.clone(),
            path: resource.path.clone(),
            package: settings.rest_package(),
            imports: imports.into_iter().collect(),
            javadoc: javadoc_lines(&format!("Operations under {}.", resource.path)),
            operations,
        };
        Ok(serde_json::to_value(&context)?)
    }

    fn data_type(
        &self,
        data_type: &DataType,
        settings: &ProjectSettings,
    ) -> crate::Result<JsonValue> {
        let model_package = settings.model_package();
        let mut imports: BTreeSet<String> = BTreeSet::new();
        let mut fields = Vec::new();
        let mut constants = Vec::new();
        let mut reason = None;
        let mut enum_type = "String".to_string();

        let kind = match &data_type.kind {
            DataTypeKind::Object { fields: model_fields } => {
                if !model_fields.is_empty() {
                    imports.insert(format!("{}.JsonProperty", JACKSON));
                    imports.insert(format!("{}.JsonPropertyOrder", JACKSON));
                }
                imports.insert(format!("{}.JsonInclude", JACKSON));
                for field in model_fields {
                    let ty = java_type(&field.type_ref, &model_package);
                    imports.extend(ty.imports);
                    let wire_literal = java_string_literal(&field.name);
                    let suffix = accessor_suffix(&field.field_name);
                    fields.push(FieldContext {
                        field_name: field.field_name.clone(),
                        json_property: if field.required {
                            format!("value = {}, required = true", wire_literal)
                        } else {
                            wire_literal.clone()
                        },
                        wire_literal,
                        java_type: ty.name,
                        getter: format!("get{}", suffix),
                        setter: format!("set{}", suffix),
                        javadoc: field.description.as_deref().map(javadoc_lines).unwrap_or_default(),
                    });
                }
                "object"
            }
            DataTypeKind::Enum { values, value_type } => {
                imports.insert(format!("{}.JsonCreator", JACKSON));
                imports.insert(format!("{}.JsonValue", JACKSON));
                let numeric = numeric_enum_type(value_type, values);
                enum_type = numeric.unwrap_or("String").to_string();
                for value in values {
                    let base = java_constant_name(value);
                    let mut name = base.clone();
                    let mut counter = 2;
                    while constants.iter().any(|c: &ConstantContext| c.name == name) {
                        name = format!("{}_{}", base, counter);
                        counter += 1;
                    }
                    let literal = match numeric {
                        Some(java) => numeric_literal(value, java),
                        None => java_string_literal(value),
                    };
                    constants.push(ConstantContext { name, literal });
                }
                "enum"
            }
            DataTypeKind::Placeholder { reason: why } => {
                imports.insert(format!("{}.JsonIgnoreProperties", JACKSON));
                reason = Some(comment_text(why));
                "placeholder"
            }
        };

        // Same-package types need no import
        let own_prefix = format!("{}.", model_package);
        let imports: Vec<String> = imports
            .into_iter()
            .filter(|i| {
                !i.strip_prefix(&own_prefix)
                    .is_some_and(|rest| !rest.contains('.'))
            })
            .collect();

        let javadoc = match data_type.description.as_deref().map(javadoc_lines) {
            Some(lines) if !lines.is_empty() => lines,
            _ => javadoc_lines(&format!("Generated from {}.", data_type.source)),
        };

        let context = DataTypeContext {
            class_name: data_type.name.clone(),
            package: model_package,
            kind,
            source: comment_text(&data_type.source),
            imports,
            javadoc: javadoc.into_iter().map(|l| l.replace("*/", "*&#47;")).collect(),
            fields,
            constants,
            enum_type,
            reason,
        };
        Ok(serde_json::to_value(&context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Field, HttpMethod, Parameter, ParameterLocation, Project, RequestBody, ResponseBody,
    };

    fn settings() -> ProjectSettings {
        ProjectSettings {
            group_id: "io.openapi".into(),
            artifact_id: "simple".into(),
            base_package: "io.openapi.simple".into(),
        }
    }

    fn string_with(format: &str) -> TypeRef {
        TypeRef::Primitive {
            primitive: Primitive::String,
            format: Some(format.into()),
        }
    }

    #[test]
    fn test_type_table() {
        let pkg = "x.model";
        let name = |t: TypeRef| java_type(&t, pkg).name;
        assert_eq!(name(TypeRef::string()), "String");
        assert_eq!(name(string_with("date")), "LocalDate");
        assert_eq!(name(string_with("date-time")), "OffsetDateTime");
        assert_eq!(name(string_with("uuid")), "UUID");
        assert_eq!(name(string_with("binary")), "byte[]");
        assert_eq!(name(string_with("email")), "String");
        assert_eq!(
            name(TypeRef::Primitive { primitive: Primitive::Integer, format: Some("int64".into()) }),
            "Long"
        );
        assert_eq!(
            name(TypeRef::Primitive { primitive: Primitive::Integer, format: None }),
            "Integer"
        );
        assert_eq!(
            name(TypeRef::Primitive { primitive: Primitive::Number, format: Some("float".into()) }),
            "Float"
        );
        assert_eq!(
            name(TypeRef::Primitive { primitive: Primitive::Number, format: None }),
            "Double"
        );
        assert_eq!(
            name(TypeRef::Primitive { primitive: Primitive::Boolean, format: None }),
            "Boolean"
        );
        assert_eq!(name(TypeRef::Any), "Object");

        let nested = java_type(
            &TypeRef::Map {
                values: Box::new(TypeRef::Array {
                    items: Box::new(TypeRef::named("Beer")),
                }),
            },
            pkg,
        );
        assert_eq!(nested.name, "Map<String, List<Beer>>");
        assert_eq!(
            nested.imports.into_iter().collect::<Vec<_>>(),
            vec!["java.util.List", "java.util.Map", "x.model.Beer"]
        );
    }

    #[test]
    fn test_escaping() {
        assert_eq!(java_string_literal("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(xml_escape("Beer & <Ale>"), "Beer &amp; &lt;Ale&gt;");
        assert_eq!(
            javadoc_lines("\nEnds a comment */ early\r\nsecond  \n\n"),
            vec!["Ends a comment *&#47; early", "second"]
        );
        assert_eq!(javadoc_lines("\\u000a"), vec!["&#92;u000a"]);
        assert_eq!(comment_text("id\\u000a\nnext"), "id\\\\u000a next");
    }

    #[test]
    fn test_sub_path() {
        assert_eq!(sub_path("/beers", "/beers"), None);
        assert_eq!(sub_path("/beers", "/beers/{id}"), Some("/{id}".into()));
        assert_eq!(sub_path("/", "/"), None);
        assert_eq!(sub_path("/", "/{id}"), Some("/{id}".into()));
    }

    #[test]
    fn test_resource_context() {
        let resource = Resource {
            name: "beers".into(),
            class_name: "BeersResource".into(),
            path: "/beers".into(),
            operations: vec![Operation {
                operation_id: "updateBeer".into(),
                method_name: "updateBeer".into(),
                method: HttpMethod::Put,
                path: "/beers/{id}".into(),
                summary: Some("Update a beer".into()),
                description: None,
                deprecated: false,
                tags: vec![],
                parameters: vec![Parameter {
                    name: "id".into(),
                    field_name: "id".into(),
                    location: ParameterLocation::Path,
                    required: true,
                    type_ref: TypeRef::Primitive {
                        primitive: Primitive::Integer,
                        format: Some("int64".into()),
                    },
                    description: None,
                }],
                request_body: Some(RequestBody {
                    type_ref: TypeRef::named("Beer"),
                    media_type: "application/json".into(),
                    required: true,
                }),
                response: Some(ResponseBody {
                    status: "200".into(),
                    type_ref: Some(TypeRef::named("Beer")),
                    media_type: Some("application/json".into()),
                }),
                consumes: vec!["application/json".into()],
                produces: vec!["application/json".into()],
                diagnostics: vec![],
            }],
        };
        let ctx = JavaContextBuilder.resource(&resource, &settings()).unwrap();
        let op = &ctx["operations"][0];
        assert_eq!(op["http_method"], "PUT");
        assert_eq!(op["sub_path"], "/{id}");
        assert_eq!(op["return_type"], "Beer");
        assert_eq!(
            op["arguments"],
            json!(["@PathParam(\"id\") Long id", "Beer body"])
        );
        let imports: Vec<&str> = ctx["imports"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i.as_str().unwrap())
            .collect();
        assert!(imports.contains(&"io.openapi.simple.model.Beer"));
        assert!(imports.contains(&"javax.ws.rs.PUT"));
        assert!(imports.contains(&"javax.ws.rs.Consumes"));
    }

    #[test]
    fn test_data_type_context() {
        let dt = DataType {
            name: "Beer".into(),
            source: "#/components/schemas/Beer".into(),
            description: None,
            kind: DataTypeKind::Object {
                fields: vec![
                    Field {
                        name: "first_name".into(),
                        field_name: "firstName".into(),
                        type_ref: TypeRef::string(),
                        required: true,
                        description: Some("Brewer */ name".into()),
                    },
                    Field {
                        name: "style".into(),
                        field_name: "style".into(),
                        type_ref: TypeRef::named("Style"),
                        required: false,
                        description: None,
                    },
                ],
            },
        };
        let ctx = JavaContextBuilder.data_type(&dt, &settings()).unwrap();
        assert_eq!(ctx["kind"], "object");
        let field = &ctx["fields"][0];
        assert_eq!(field["getter"], "getFirstName");
        assert_eq!(field["setter"], "setFirstName");
        assert_eq!(field["json_property"], "value = \"first_name\", required = true");
        assert_eq!(field["javadoc"], json!(["Brewer *&#47; name"]));
        // Style lives in the same package
        assert!(!ctx["imports"]
            .as_array()
            .unwrap()
            .contains(&json!("io.openapi.simple.model.Style")));
    }

    #[test]
    fn test_enum_constants_are_unique() {
        let dt = DataType {
            name: "Style".into(),
            source: "#/components/schemas/Style".into(),
            description: None,
            kind: DataTypeKind::Enum {
                values: vec!["pale-ale".into(), "pale_ale".into(), "1".into()],
                value_type: TypeRef::string(),
            },
        };
        let ctx = JavaContextBuilder.data_type(&dt, &settings()).unwrap();
        let names: Vec<&str> = ctx["constants"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["PALE_ALE", "PALE_ALE_2", "_1"]);
    }

    #[test]
    fn test_numeric_enum_constants() {
        let rating = |format: &str, values: &[&str]| DataType {
            name: "Rating".into(),
            source: "#/components/schemas/Rating".into(),
            description: None,
            kind: DataTypeKind::Enum {
                values: values.iter().map(|v| v.to_string()).collect(),
                value_type: TypeRef::Primitive {
                    primitive: Primitive::Integer,
                    format: Some(format.into()),
                },
            },
        };
        let literals = |ctx: &JsonValue| -> Vec<String> {
            ctx["constants"]
                .as_array()
                .unwrap()
                .iter()
                .map(|c| c["literal"].as_str().unwrap().to_string())
                .collect()
        };

        let ctx = JavaContextBuilder
            .data_type(&rating("int32", &["1", "-2"]), &settings())
            .unwrap();
        assert_eq!(ctx["enum_type"], "Integer");
        assert_eq!(literals(&ctx), vec!["1", "-2"]);

        let ctx = JavaContextBuilder
            .data_type(&rating("int64", &["1"]), &settings())
            .unwrap();
        assert_eq!(ctx["enum_type"], "Long");
        assert_eq!(literals(&ctx), vec!["1L"]);

        // A value that is not a number keeps the string backing
        let ctx = JavaContextBuilder
            .data_type(&rating("int32", &["1", "one"]), &settings())
            .unwrap();
        assert_eq!(ctx["enum_type"], "String");
        assert_eq!(literals(&ctx), vec!["\"1\"", "\"one\""]);
    }

    #[test]
    fn test_line_comments_cannot_escape() {
        let dt = DataType {
            name: "Odd".into(),
            source: "#/components/schemas/Odd\\u000a".into(),
            description: None,
            kind: DataTypeKind::Placeholder {
                reason: "'oneOf' composition\nis not supported".into(),
            },
        };
        let ctx = JavaContextBuilder.data_type(&dt, &settings()).unwrap();
        assert_eq!(ctx["source"], "#/components/schemas/Odd\\\\u000a");
        assert_eq!(ctx["reason"], "'oneOf' composition is not supported");
        assert_eq!(ctx["javadoc"][0], "Generated from #/components/schemas/Odd&#92;u000a.");
    }

    #[test]
    fn test_contract_lists_operations_and_types() {
        let model = GenerationModel {
            project: Project {
                name: "beer-api".into(),
                title: "Beer API".into(),
                version: "1.0.0".into(),
                description: None,
                package: "api.beer".into(),
                base_path: "/".into(),
            },
            resources: vec![],
            data_types: vec![DataType {
                name: "Beer".into(),
                source: "#/components/schemas/Beer".into(),
                description: None,
                kind: DataTypeKind::Object { fields: vec![] },
            }],
            diagnostics: vec![],
        };
        let contract = contract(&model, &settings());
        assert_eq!(contract["project"]["basePackage"], "io.openapi.simple");
        assert_eq!(contract["types"][0]["className"], "io.openapi.simple.model.Beer");
        assert_eq!(contract["types"][0]["kind"], "object");
    }

    #[test]
    fn test_maven_version() {
        assert_eq!(maven_version("1.0.0"), "1.0.0");
        assert_eq!(maven_version("v1 beta"), FALLBACK_MAVEN_VERSION);
    }
}

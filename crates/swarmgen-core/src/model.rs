//! The generation model: the normalized hand-off between extraction and rendering.
//!
//! A [`GenerationModel`] is produced by [`crate::extract`] (or injected by a
//! caller through [`crate::generate::SuppliedModel`]) and is read-only from then
//! on. It is self-describing: the renderer never looks at the original
//! specification again, so a serialized model is enough to regenerate a project.

// Internal imports (std, crate)
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// Root of the generation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationModel {
    pub project: Project,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub data_types: Vec<DataType>,
    /// Non-fatal issues recorded during extraction
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

/// Project identity as declared by the specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Lower-kebab form of the title
    pub name: String,
    /// Title exactly as declared in `info.title`
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default Java package derived from the title
    pub package: String,
    /// Path of the first declared server, used as the JAX-RS application path
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

fn default_base_path() -> String {
    "/".to_string()
}

/// Operations sharing the first path segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// First path segment (`beers`), or `root`
    pub name: String,
    /// Generated class name (`BeersResource`)
    pub class_name: String,
    /// Base path of the resource (`/beers`)
    pub path: String,
    pub operations: Vec<Operation>,
}

/// HTTP methods in the order operations are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// All methods, in emission order
    pub const ALL: [HttpMethod; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// Key of the method inside an OpenAPI path item
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }

    /// Upper-case verb, also the JAX-RS annotation name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,
    /// Java method name, unique within the owning resource
    pub method_name: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseBody>,
    #[serde(default)]
    pub consumes: Vec<String>,
    #[serde(default)]
    pub produces: Vec<String>,
    /// Diagnostic messages attached to this operation
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Parse the OpenAPI `in` value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }

    /// JAX-RS parameter annotation
    pub fn annotation(&self) -> &'static str {
        match self {
            Self::Path => "PathParam",
            Self::Query => "QueryParam",
            Self::Header => "HeaderParam",
            Self::Cookie => "CookieParam",
        }
    }
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Wire name
    pub name: String,
    /// Java argument name
    pub field_name: String,
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload accepted by an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    pub media_type: String,
    #[serde(default)]
    pub required: bool,
}

/// Successful response of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    /// Status code key (`200`, `201`, `default`)
    pub status: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// Primitive schema kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
}

/// Reference from an operation or field to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeRef {
    /// Inlined primitive with its optional `format`
    #[serde(rename_all = "camelCase")]
    Primitive {
        primitive: Primitive,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    /// A [`DataType`] of the same model
    #[serde(rename_all = "camelCase")]
    Named {
        name: String,
        /// Set when the reference closes a cycle
        #[serde(default)]
        by_reference: bool,
    },
    Array { items: Box<TypeRef> },
    Map { values: Box<TypeRef> },
    /// Free-form value
    Any,
}

impl TypeRef {
    /// Plain string primitive
    pub fn string() -> Self {
        Self::Primitive {
            primitive: Primitive::String,
            format: None,
        }
    }

    /// Reference to a named data type
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            by_reference: false,
        }
    }

    /// Names of every data type this reference mentions, nested ones included.
    pub fn named_types(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_named(&mut names);
        names
    }

    fn collect_named<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Named { name, .. } => out.push(name),
            Self::Array { items } => items.collect_named(out),
            Self::Map { values } => values.collect_named(out),
            Self::Primitive { .. } | Self::Any => {}
        }
    }
}

/// A generated type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataType {
    /// Class name, unique within the model
    pub name: String,
    /// JSON pointer of the originating schema
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: DataTypeKind,
}

/// Shape of a generated type, flattened into [`DataType`] under `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataTypeKind {
    Object {
        fields: Vec<Field>,
    },
    #[serde(rename_all = "camelCase")]
    Enum {
        values: Vec<String>,
        /// Type of the constants; numeric enums keep their wire type
        #[serde(default = "TypeRef::string")]
        value_type: TypeRef,
    },
    /// Best-effort stand-in for a schema the generator cannot map
    Placeholder {
        reason: String,
    },
}

/// A property of an object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Wire name
    pub name: String,
    /// Java field name
    pub field_name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Category of a recorded non-fatal issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    UnsupportedConstruct,
}

/// A non-fatal issue found while extracting the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// JSON pointer into the specification
    pub location: String,
    pub message: String,
}

impl Diagnostic {
    /// Record an unsupported construct
    pub fn unsupported(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::UnsupportedConstruct,
            location: location.into(),
            message: message.into(),
        }
    }

    /// Promote this diagnostic to an error
    pub fn into_error(self) -> Error {
        match self.kind {
            DiagnosticKind::UnsupportedConstruct => Error::unsupported(self.location, self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.location)
    }
}

impl GenerationModel {
    /// Parse a pre-serialized model
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Serialize the model as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a data type by name
    pub fn data_type(&self, name: &str) -> Option<&DataType> {
        self.data_types.iter().find(|dt| dt.name == name)
    }

    /// Every operation of every resource, in model order
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.resources.iter().flat_map(|r| r.operations.iter())
    }

    /// Names of data types referenced by any operation, sorted.
    pub fn operation_types(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        for op in self.operations() {
            for param in &op.parameters {
                names.extend(param.type_ref.named_types());
            }
            if let Some(body) = &op.request_body {
                names.extend(body.type_ref.named_types());
            }
            if let Some(type_ref) = op.response.as_ref().and_then(|r| r.type_ref.as_ref()) {
                names.extend(type_ref.named_types());
            }
        }
        names
    }

    /// Check the model invariants: unique data type names and no dangling references.
    pub fn validate(&self) -> Result<()> {
        let mut known = BTreeSet::new();
        for dt in &self.data_types {
            if !known.insert(dt.name.as_str()) {
                return Err(Error::specification(
                    dt.source.clone(),
                    format!("duplicate data type name '{}'", dt.name),
                ));
            }
        }

        let dangling = |name: &str, location: &str| {
            Error::specification(
                location.to_string(),
                format!("reference to unknown data type '{}'", name),
            )
        };

        for op in self.operations() {
            let location = format!("{} {}", op.method, op.path);
            let mut refs: Vec<&str> = Vec::new();
            for param in &op.parameters {
                refs.extend(param.type_ref.named_types());
            }
            if let Some(body) = &op.request_body {
                refs.extend(body.type_ref.named_types());
            }
            if let Some(type_ref) = op.response.as_ref().and_then(|r| r.type_ref.as_ref()) {
                refs.extend(type_ref.named_types());
            }
            if let Some(name) = refs.into_iter().find(|n| !known.contains(n)) {
                return Err(dangling(name, &location));
            }
        }

        for dt in &self.data_types {
            if let DataTypeKind::Object { fields } = &dt.kind {
                for field in fields {
                    if let Some(name) = field
                        .type_ref
                        .named_types()
                        .into_iter()
                        .find(|n| !known.contains(n))
                    {
                        return Err(dangling(name, &dt.source));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> GenerationModel {
        GenerationModel {
            project: Project {
                name: "beer-api".to_string(),
                title: "Beer API".to_string(),
                version: "1.0.0".to_string(),
                description: None,
                package: "api.beer".to_string(),
                base_path: "/".to_string(),
            },
            resources: vec![Resource {
                name: "beers".to_string(),
                class_name: "BeersResource".to_string(),
                path: "/beers".to_string(),
                operations: vec![Operation {
                    operation_id: "listBeers".to_string(),
                    method_name: "listBeers".to_string(),
                    method: HttpMethod::Get,
                    path: "/beers".to_string(),
                    summary: None,
                    description: None,
                    deprecated: false,
                    tags: vec![],
                    parameters: vec![],
                    request_body: None,
                    response: Some(ResponseBody {
                        status: "200".to_string(),
                        type_ref: Some(TypeRef::Array {
                            items: Box::new(TypeRef::named("Beer")),
                        }),
                        media_type: Some("application/json".to_string()),
                    }),
                    consumes: vec![],
                    produces: vec!["application/json".to_string()],
                    diagnostics: vec![],
                }],
            }],
            data_types: vec![DataType {
                name: "Beer".to_string(),
                source: "#/components/schemas/Beer".to_string(),
                description: None,
                kind: DataTypeKind::Object { fields: vec![] },
            }],
            diagnostics: vec![],
        }
    }

    #[test]
    fn test_type_ref_wire_format() {
        let type_ref = TypeRef::Array {
            items: Box::new(TypeRef::named("Beer")),
        };
        assert_eq!(
            serde_json::to_value(&type_ref).unwrap(),
            json!({"kind": "array", "items": {"kind": "named", "name": "Beer", "byReference": false}})
        );
        let primitive: TypeRef =
            serde_json::from_value(json!({"kind": "primitive", "primitive": "integer", "format": "int64"}))
                .unwrap();
        assert_eq!(
            primitive,
            TypeRef::Primitive {
                primitive: Primitive::Integer,
                format: Some("int64".to_string())
            }
        );
    }

    #[test]
    fn test_validate_accepts_consistent_model() {
        let model = sample();
        assert!(model.validate().is_ok());
        assert_eq!(model.operation_types().into_iter().collect::<Vec<_>>(), vec!["Beer"]);
    }

    #[test]
    fn test_validate_rejects_dangling_reference() {
        let mut model = sample();
        model.data_types.clear();
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("unknown data type 'Beer'"));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let mut model = sample();
        let dup = model.data_types[0].clone();
        model.data_types.push(dup);
        assert!(matches!(
            model.validate(),
            Err(Error::SpecificationInvalid { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_model() {
        let model = sample();
        let json = model.to_json().unwrap();
        assert_eq!(GenerationModel::from_json(&json).unwrap(), model);
    }
}

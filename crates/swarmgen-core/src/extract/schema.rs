//! Depth-first schema walker turning OpenAPI schemas into [`TypeRef`]s and [`DataType`]s.

// Internal imports (std, crate)
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    error::{Error, Result},
    model::{DataType, DataTypeKind, Diagnostic, Field, Primitive, TypeRef},
    naming::{java_class_name, java_field_name, to_upper_camel_case},
    openapi::{OpenApiContext, escape_pointer_token},
};

// External imports (alphabetized)
use serde_json::{Map, Value as JsonValue};

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Class names that would shadow types used by the generated beans.
///
/// Covers `java.lang` plus every simple name the generated resources and beans import.
const RESERVED_CLASS_NAMES: &[&str] = &[
    // java.lang
    "Object",
    "String",
    "Integer",
    "Long",
    "Float",
    "Double",
    "Boolean",
    "Override",
    "Deprecated",
    "IllegalArgumentException",
    // java.util, java.time
    "List",
    "Map",
    "UUID",
    "LocalDate",
    "OffsetDateTime",
    // Jackson
    "JsonProperty",
    "JsonInclude",
    "JsonPropertyOrder",
    "JsonCreator",
    "JsonValue",
    "JsonIgnoreProperties",
    // JAX-RS
    "Path",
    "Produces",
    "Consumes",
    "GET",
    "PUT",
    "POST",
    "DELETE",
    "OPTIONS",
    "HEAD",
    "PATCH",
    "PathParam",
    "QueryParam",
    "HeaderParam",
    "CookieParam",
    "WebApplicationException",
    "Response",
];

#[derive(Debug, Clone)]
enum NamedState {
    /// Being resolved; `is_type` tells whether it will become a data type
    InProgress { class: String, is_type: bool },
    /// Resolved to a data type or an inlined alias
    Done(TypeRef),
}

/// Walks schemas once, remembering every named and hoisted type.
pub(crate) struct SchemaWalker<'a> {
    spec: &'a OpenApiContext,
    named: BTreeMap<String, NamedState>,
    /// Non-component `$ref` pointers; `None` while the target is being walked
    pointers: BTreeMap<String, Option<TypeRef>>,
    /// Hoisted classes whose fields are being built
    building: HashSet<String>,
    /// Class name -> source pointer of its owner
    taken: BTreeMap<String, String>,
    /// Canonical JSON of hoisted inline schemas -> class name
    inline: HashMap<String, String>,
    data_types: Vec<DataType>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> SchemaWalker<'a> {
    pub(crate) fn new(spec: &'a OpenApiContext) -> Self {
        Self {
            spec,
            named: BTreeMap::new(),
            pointers: BTreeMap::new(),
            building: HashSet::new(),
            taken: BTreeMap::new(),
            inline: HashMap::new(),
            data_types: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Resolve every schema declared under `components.schemas`.
    pub(crate) fn walk_components(&mut self) -> Result<()> {
        let names: Vec<String> = self
            .spec
            .schemas()
            .map(|schemas| schemas.keys().cloned().collect())
            .unwrap_or_default();
        for name in names {
            self.resolve_named(&name)?;
        }
        Ok(())
    }

    /// Record a non-fatal issue
    pub(crate) fn report(&mut self, location: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic::unsupported(location, message);
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Hand back the collected data types (sorted by name) and diagnostics.
    pub(crate) fn finish(mut self) -> (Vec<DataType>, Vec<Diagnostic>) {
        self.data_types.sort_by(|a, b| a.name.cmp(&b.name));
        (self.data_types, self.diagnostics)
    }

    /// Map a schema (inline or `$ref`) to a type reference.
    ///
    /// `hint` names the type should the schema need hoisting; `location` is the
    /// JSON pointer of the schema in the document.
    pub(crate) fn type_ref(
        &mut self,
        schema: &JsonValue,
        hint: &str,
        location: &str,
    ) -> Result<TypeRef> {
        let Some(obj) = schema.as_object() else {
            // `true` / `{}`-like free-form schemas
            return Ok(TypeRef::Any);
        };

        if let Some(reference) = obj.get("$ref").and_then(JsonValue::as_str) {
            return self.type_ref_for_reference(reference, hint, location);
        }

        if is_composed(obj) || obj.contains_key("enum") || obj.contains_key("properties") {
            return self.hoist(schema, hint, location);
        }

        match obj.get("type") {
            Some(JsonValue::String(t)) => match t.as_str() {
                "string" => Ok(primitive(Primitive::String, obj)),
                "integer" => Ok(primitive(Primitive::Integer, obj)),
                "number" => Ok(primitive(Primitive::Number, obj)),
                "boolean" => Ok(primitive(Primitive::Boolean, obj)),
                "array" => {
                    let items = match obj.get("items") {
                        Some(items) => self.type_ref(
                            items,
                            &format!("{}Item", hint),
                            &format!("{}/items", location),
                        )?,
                        None => TypeRef::Any,
                    };
                    Ok(TypeRef::Array {
                        items: Box::new(items),
                    })
                }
                "object" => self.map_or_any(obj, hint, location),
                other => {
                    self.report(location, format!("schema type '{}' is not supported", other));
                    Ok(TypeRef::Any)
                }
            },
            Some(other) => {
                self.report(location, format!("schema type {} is not supported", other));
                Ok(TypeRef::Any)
            }
            None => self.map_or_any(obj, hint, location),
        }
    }

    fn map_or_any(
        &mut self,
        obj: &Map<String, JsonValue>,
        hint: &str,
        location: &str,
    ) -> Result<TypeRef> {
        match obj.get("additionalProperties") {
            Some(JsonValue::Bool(true)) => Ok(TypeRef::Map {
                values: Box::new(TypeRef::Any),
            }),
            Some(values @ JsonValue::Object(_)) => {
                let values = self.type_ref(
                    values,
                    &format!("{}Value", hint),
                    &format!("{}/additionalProperties", location),
                )?;
                Ok(TypeRef::Map {
                    values: Box::new(values),
                })
            }
            _ => Ok(TypeRef::Any),
        }
    }

    fn type_ref_for_reference(
        &mut self,
        reference: &str,
        hint: &str,
        location: &str,
    ) -> Result<TypeRef> {
        if let Some(name) = reference
            .strip_prefix(SCHEMA_REF_PREFIX)
            .filter(|name| !name.contains('/'))
        {
            return self.resolve_named(&unescape_pointer_token(name));
        }
        if reference.starts_with('#') {
            return self.resolve_pointer(reference, hint);
        }
        self.report(
            location,
            format!("external reference '{}' is not supported", reference),
        );
        Ok(TypeRef::Any)
    }

    /// Walk the schema behind some other internal pointer, at most once.
    fn resolve_pointer(&mut self, reference: &str, hint: &str) -> Result<TypeRef> {
        match self.pointers.get(reference) {
            Some(Some(type_ref)) => return Ok(type_ref.clone()),
            Some(None) => {
                self.report(reference, "recursive alias schema mapped to a free-form value");
                return Ok(TypeRef::Any);
            }
            None => {}
        }

        let target = self.spec.resolve_ref(reference)?.clone();
        if target.as_object().is_some_and(is_data_type) {
            // Hoisting dedupes by content, which also closes cycles
            return self.hoist(&target, hint, reference);
        }
        self.pointers.insert(reference.to_string(), None);
        let type_ref = self.type_ref(&target, hint, reference)?;
        self.pointers
            .insert(reference.to_string(), Some(type_ref.clone()));
        Ok(type_ref)
    }

    /// Resolve a component schema exactly once.
    pub(crate) fn resolve_named(&mut self, name: &str) -> Result<TypeRef> {
        match self.named.get(name) {
            Some(NamedState::Done(type_ref)) => return Ok(type_ref.clone()),
            Some(NamedState::InProgress { class, is_type }) => {
                if *is_type {
                    return Ok(TypeRef::Named {
                        name: class.clone(),
                        by_reference: true,
                    });
                }
                let location = format!("{}{}", SCHEMA_REF_PREFIX, escape_pointer_token(name));
                self.report(location, "recursive alias schema mapped to a free-form value");
                return Ok(TypeRef::Any);
            }
            None => {}
        }

        let source = format!("{}{}", SCHEMA_REF_PREFIX, escape_pointer_token(name));
        let schema = self
            .spec
            .schemas()
            .and_then(|schemas| schemas.get(name))
            .cloned()
            .ok_or_else(|| Error::specification(source.clone(), "unresolved reference"))?;

        let is_type = schema.as_object().is_some_and(is_data_type);
        if !is_type {
            log::debug!("Inlining alias schema {}", name);
            self.named.insert(
                name.to_string(),
                NamedState::InProgress {
                    class: String::new(),
                    is_type: false,
                },
            );
            let type_ref = self.type_ref(&schema, &java_class_name(name), &source)?;
            self.named
                .insert(name.to_string(), NamedState::Done(type_ref.clone()));
            return Ok(type_ref);
        }

        let class = self.claim_name(&java_class_name(name), &source);
        log::debug!("Resolving schema {} as {}", name, class);
        self.named.insert(
            name.to_string(),
            NamedState::InProgress {
                class: class.clone(),
                is_type: true,
            },
        );
        self.build_data_type(&schema, &class, &source)?;
        let type_ref = TypeRef::named(class);
        self.named
            .insert(name.to_string(), NamedState::Done(type_ref.clone()));
        Ok(type_ref)
    }

    /// Turn an inline schema into a named data type, reusing structurally identical ones.
    fn hoist(&mut self, schema: &JsonValue, hint: &str, location: &str) -> Result<TypeRef> {
        let canonical = schema.to_string();
        if let Some(class) = self.inline.get(&canonical) {
            return Ok(TypeRef::Named {
                name: class.clone(),
                by_reference: self.building.contains(class),
            });
        }
        let class = self.claim_name(&java_class_name(hint), location);
        self.inline.insert(canonical, class.clone());
        self.building.insert(class.clone());
        self.build_data_type(schema, &class, location)?;
        self.building.remove(&class);
        Ok(TypeRef::named(class))
    }

    /// Pick a unique class name; collisions get a numeric suffix in walk order.
    fn claim_name(&mut self, candidate: &str, source: &str) -> String {
        let base = if RESERVED_CLASS_NAMES.contains(&candidate) {
            format!("{}Model", candidate)
        } else {
            candidate.to_string()
        };
        let mut name = base.clone();
        let mut counter = 2;
        while self.taken.contains_key(&name) {
            name = format!("{}{}", base, counter);
            counter += 1;
        }
        self.taken.insert(name.clone(), source.to_string());
        name
    }

    fn build_data_type(&mut self, schema: &JsonValue, class: &str, source: &str) -> Result<()> {
        let obj = schema.as_object().cloned().unwrap_or_default();
        let description = obj
            .get("description")
            .and_then(JsonValue::as_str)
            .map(String::from);

        let kind = if let Some(combinator) = unsupported_combinator(&obj) {
            let reason = format!("'{}' composition is not supported", combinator);
            self.report(source, reason.clone());
            DataTypeKind::Placeholder { reason }
        } else if let Some(values) = obj.get("enum").and_then(JsonValue::as_array) {
            let value_type = match enum_value_type(&obj, values) {
                Ok(value_type) => value_type,
                Err(reason) => {
                    self.report(source, reason);
                    TypeRef::string()
                }
            };
            DataTypeKind::Enum {
                values: values.iter().filter_map(enum_value).collect(),
                value_type,
            }
        } else {
            match self.collect_properties(&obj, source, 0)? {
                Ok((properties, required)) => {
                    let fields = self.build_fields(class, properties, &required)?;
                    DataTypeKind::Object { fields }
                }
                Err(reason) => {
                    self.report(source, reason.clone());
                    DataTypeKind::Placeholder { reason }
                }
            }
        };

        self.data_types.push(DataType {
            name: class.to_string(),
            source: source.to_string(),
            description,
            kind,
        });
        Ok(())
    }

    /// Gather properties and required names, flattening `allOf`.
    ///
    /// The inner `Err` carries the reason when a member cannot be flattened.
    #[allow(clippy::type_complexity)]
    fn collect_properties(
        &self,
        obj: &Map<String, JsonValue>,
        source: &str,
        depth: usize,
    ) -> Result<std::result::Result<(Vec<(String, JsonValue, String)>, Vec<String>), String>> {
        if depth > 16 {
            return Ok(Err("allOf nesting is too deep".to_string()));
        }
        let mut properties: Vec<(String, JsonValue, String)> = Vec::new();
        let mut required: Vec<String> = Vec::new();

        if let Some(members) = obj.get("allOf").and_then(JsonValue::as_array) {
            for (i, member) in members.iter().enumerate() {
                let member_source = match member.get("$ref").and_then(JsonValue::as_str) {
                    Some(reference) => reference.to_string(),
                    None => format!("{}/allOf/{}", source, i),
                };
                let resolved = self.spec.deref(member)?;
                let Some(member_obj) = resolved.as_object() else {
                    continue;
                };
                if let Some(combinator) = unsupported_combinator(member_obj) {
                    return Ok(Err(format!(
                        "'{}' composition inside allOf is not supported",
                        combinator
                    )));
                }
                match self.collect_properties(member_obj, &member_source, depth + 1)? {
                    Ok((member_props, member_required)) => {
                        for (name, schema, origin) in member_props {
                            properties.retain(|(n, _, _)| n != &name);
                            properties.push((name, schema, origin));
                        }
                        required.extend(member_required);
                    }
                    Err(reason) => return Ok(Err(reason)),
                }
            }
        }

        if let Some(props) = obj.get("properties").and_then(JsonValue::as_object) {
            for (name, schema) in props {
                properties.retain(|(n, _, _)| n != name);
                let origin = format!("{}/properties/{}", source, escape_pointer_token(name));
                properties.push((name.clone(), schema.clone(), origin));
            }
        }

        if let Some(names) = obj.get("required").and_then(JsonValue::as_array) {
            required.extend(names.iter().filter_map(JsonValue::as_str).map(String::from));
        }

        Ok(Ok((properties, required)))
    }

    fn build_fields(
        &mut self,
        class: &str,
        properties: Vec<(String, JsonValue, String)>,
        required: &[String],
    ) -> Result<Vec<Field>> {
        let mut fields: Vec<Field> = Vec::with_capacity(properties.len());
        for (name, schema, origin) in properties {
            let hint = format!("{}{}", class, to_upper_camel_case(&name));
            let type_ref = self.type_ref(&schema, &hint, &origin)?;

            let mut field_name = java_field_name(&name);
            let base = field_name.clone();
            let mut counter = 2;
            while fields.iter().any(|f| f.field_name == field_name) {
                field_name = format!("{}{}", base, counter);
                counter += 1;
            }

            fields.push(Field {
                required: required.contains(&name),
                description: schema
                    .get("description")
                    .and_then(JsonValue::as_str)
                    .map(String::from),
                name,
                field_name,
                type_ref,
            });
        }
        Ok(fields)
    }
}

fn primitive(primitive: Primitive, obj: &Map<String, JsonValue>) -> TypeRef {
    TypeRef::Primitive {
        primitive,
        format: obj
            .get("format")
            .and_then(JsonValue::as_str)
            .map(String::from),
    }
}

fn is_composed(obj: &Map<String, JsonValue>) -> bool {
    ["allOf", "oneOf", "anyOf", "not"]
        .iter()
        .any(|k| obj.contains_key(*k))
}

fn unsupported_combinator(obj: &Map<String, JsonValue>) -> Option<&'static str> {
    ["oneOf", "anyOf", "not"]
        .into_iter()
        .find(|k| obj.contains_key(*k))
}

/// Whether a named schema becomes its own generated type rather than being inlined.
fn is_data_type(obj: &Map<String, JsonValue>) -> bool {
    if obj.contains_key("$ref") {
        return false;
    }
    if is_composed(obj) || obj.contains_key("enum") || obj.contains_key("properties") {
        return true;
    }
    obj.get("type").and_then(JsonValue::as_str) == Some("object")
        && !matches!(
            obj.get("additionalProperties"),
            Some(JsonValue::Bool(true)) | Some(JsonValue::Object(_))
        )
}

fn enum_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Java-side type of enum constants: strings, or numbers when every value is one.
fn enum_value_type(
    obj: &Map<String, JsonValue>,
    values: &[JsonValue],
) -> std::result::Result<TypeRef, String> {
    let present = || values.iter().filter(|v| !v.is_null());
    let format = obj.get("format").and_then(JsonValue::as_str);
    match obj.get("type").and_then(JsonValue::as_str) {
        None | Some("string") => Ok(TypeRef::string()),
        Some("integer") if present().all(|v| v.as_i64().is_some()) => {
            let fits_int = present()
                .filter_map(JsonValue::as_i64)
                .all(|v| i32::try_from(v).is_ok());
            let format = if format == Some("int64") || !fits_int {
                "int64"
            } else {
                "int32"
            };
            Ok(TypeRef::Primitive {
                primitive: Primitive::Integer,
                format: Some(format.to_string()),
            })
        }
        Some("number") if present().all(JsonValue::is_number) => {
            let format = if format == Some("float") { "float" } else { "double" };
            Ok(TypeRef::Primitive {
                primitive: Primitive::Number,
                format: Some(format.to_string()),
            })
        }
        Some(other) => Err(format!(
            "enum of type '{}' is generated with string constants",
            other
        )),
    }
}

fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

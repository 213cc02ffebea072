//! Model extraction: OpenAPI document -> [`GenerationModel`].
//!
//! The document is first checked against the typed OpenAPI 3 object graph so
//! that structurally broken input fails early with a located error. The walk
//! itself runs over the raw JSON tree, which lets constructs without a Java
//! mapping become [`Diagnostic`](crate::model::Diagnostic)s instead of errors.
//!
//! Everything produced here is sorted: resources by name, operations by
//! `(path, method)`, data types by name. Two extractions of the same document
//! therefore yield equal models.

mod schema;

// Internal imports (std, crate)
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::{Error, Result},
    model::{
        GenerationModel, HttpMethod, Operation, Parameter, ParameterLocation, Project, RequestBody,
        Resource, ResponseBody, TypeRef,
    },
    naming::{java_class_name, java_field_name, to_kebab_case, to_lower_camel_case},
    openapi::{OpenApiContext, escape_pointer_token},
    settings,
};

// External imports (alphabetized)
use serde_json::{Map, Value as JsonValue};

use schema::SchemaWalker;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Build the generation model for a specification.
pub fn extract(spec: &OpenApiContext) -> Result<GenerationModel> {
    let document = spec.validate()?;
    let title = document.info.title.trim().to_string();
    log::debug!("Extracting generation model for '{}'", title);

    let mut walker = SchemaWalker::new(spec);
    walker.walk_components()?;

    // `None` collects paths whose first segment is empty or templated
    let mut grouped: BTreeMap<Option<String>, Vec<Operation>> = BTreeMap::new();
    if let Some(paths) = spec.as_json().get("paths").and_then(JsonValue::as_object) {
        for (path, item) in paths {
            let item_location = format!("#/paths/{}", escape_pointer_token(path));
            let item = spec.deref(item)?;
            let Some(item) = item.as_object() else {
                return Err(Error::specification(item_location, "path item must be an object"));
            };

            for method in HttpMethod::ALL {
                let Some(op) = item.get(method.as_key()) else {
                    continue;
                };
                let location = format!("{}/{}", item_location, method.as_key());
                let operation =
                    extract_operation(spec, &mut walker, path, method, item, op, &location)?;
                grouped
                    .entry(resource_segment(path))
                    .or_default()
                    .push(operation);
            }
        }
    }

    let (data_types, diagnostics) = walker.finish();

    // Resource classes are imported next to model classes, so neither may clash
    let mut taken: BTreeSet<String> = data_types.iter().map(|dt| dt.name.clone()).collect();
    let mut resources = grouped
        .into_iter()
        .map(|(segment, operations)| build_resource(segment, operations, &mut taken))
        .collect::<Vec<_>>();
    resources.sort_by(|a, b| a.name.cmp(&b.name).then(a.path.cmp(&b.path)));
    let project = Project {
        name: {
            let kebab = to_kebab_case(&title);
            if kebab.is_empty() { settings::FALLBACK_ARTIFACT_ID.to_string() } else { kebab }
        },
        package: settings::derive_package(&title, None),
        base_path: spec.server_path().unwrap_or_else(|| "/".to_string()),
        version: document.info.version.clone(),
        description: document.info.description.clone(),
        title,
    };

    let model = GenerationModel {
        project,
        resources,
        data_types,
        diagnostics,
    };
    model.validate()?;
    log::debug!(
        "Extracted {} resources, {} data types, {} diagnostics",
        model.resources.len(),
        model.data_types.len(),
        model.diagnostics.len()
    );
    Ok(model)
}

/// First path segment, or `None` when it is empty or a template.
fn resource_segment(path: &str) -> Option<String> {
    path.split('/')
        .find(|s| !s.is_empty())
        .filter(|segment| !segment.starts_with('{'))
        .map(String::from)
}

fn build_resource(
    segment: Option<String>,
    mut operations: Vec<Operation>,
    taken: &mut BTreeSet<String>,
) -> Resource {
    operations.sort_by(|a, b| a.path.cmp(&b.path).then(a.method.cmp(&b.method)));

    // Method names must be unique within the generated class
    let mut seen: Vec<String> = Vec::with_capacity(operations.len());
    for op in &mut operations {
        let base = op.method_name.clone();
        let mut counter = 2;
        while seen.contains(&op.method_name) {
            op.method_name = format!("{}{}", base, counter);
            counter += 1;
        }
        seen.push(op.method_name.clone());
    }

    let (name, path) = match segment {
        Some(segment) => (segment.clone(), format!("/{}", segment)),
        None => ("root".to_string(), "/".to_string()),
    };

    // `/beer-styles` and `/beer_styles` share a class name
    let base = java_class_name(&name);
    let mut class_name = format!("{}Resource", base);
    let mut counter = 2;
    while !taken.insert(class_name.clone()) {
        class_name = format!("{}{}Resource", base, counter);
        counter += 1;
    }

    Resource {
        class_name,
        name,
        path,
        operations,
    }
}

/// `GET /beers/{id}` -> `getBeersById`
fn fallback_operation_id(method: HttpMethod, path: &str) -> String {
    let mut words = vec![method.as_key().to_string()];
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        words.push("root".to_string());
    }
    for segment in segments {
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(param) => {
                words.push("by".to_string());
                words.push(param.to_string());
            }
            None => words.push(segment.to_string()),
        }
    }
    to_lower_camel_case(&words.join(" "))
}

fn string_field(obj: &Map<String, JsonValue>, key: &str) -> Option<String> {
    obj.get(key).and_then(JsonValue::as_str).map(String::from)
}

fn extract_operation(
    spec: &OpenApiContext,
    walker: &mut SchemaWalker<'_>,
    path: &str,
    method: HttpMethod,
    item: &Map<String, JsonValue>,
    op: &JsonValue,
    location: &str,
) -> Result<Operation> {
    let op = op
        .as_object()
        .ok_or_else(|| Error::specification(location, "operation must be an object"))?;

    let operation_id = string_field(op, "operationId")
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| fallback_operation_id(method, path));
    let type_prefix = java_class_name(&operation_id);
    log::debug!("Extracting operation {} {} ({})", method, path, operation_id);

    let mut diagnostics: Vec<String> = Vec::new();

    let parameters = extract_parameters(
        spec,
        walker,
        item,
        op,
        path,
        location,
        &type_prefix,
        &mut diagnostics,
    )?;

    let mut consumes = Vec::new();
    let request_body = match op.get("requestBody") {
        Some(body) => {
            let body_location = format!("{}/requestBody", location);
            let body = spec.deref(body)?;
            let content = body.get("content").and_then(JsonValue::as_object);
            consumes = content
                .map(|c| c.keys().cloned().collect())
                .unwrap_or_default();
            match content.and_then(pick_media_type) {
                Some((media_type, media)) => {
                    let type_ref = match media.get("schema") {
                        Some(schema) => walker.type_ref(
                            schema,
                            &format!("{}Request", type_prefix),
                            &format!(
                                "{}/content/{}/schema",
                                body_location,
                                escape_pointer_token(media_type)
                            ),
                        )?,
                        None => TypeRef::Any,
                    };
                    Some(RequestBody {
                        type_ref,
                        media_type: media_type.clone(),
                        required: body
                            .get("required")
                            .and_then(JsonValue::as_bool)
                            .unwrap_or(false),
                    })
                }
                None => None,
            }
        }
        None => None,
    };

    let (response, produces) = match op.get("responses").and_then(JsonValue::as_object) {
        Some(responses) => {
            extract_response(spec, walker, responses, location, &type_prefix)?
        }
        None => (None, Vec::new()),
    };

    if op.contains_key("callbacks") {
        let message = "callbacks are not generated";
        walker.report(format!("{}/callbacks", location), message);
        diagnostics.push(message.to_string());
    }

    Ok(Operation {
        method_name: java_field_name(&operation_id),
        operation_id,
        method,
        path: path.to_string(),
        summary: string_field(op, "summary"),
        description: string_field(op, "description"),
        deprecated: op
            .get("deprecated")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false),
        tags: op
            .get("tags")
            .and_then(JsonValue::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(JsonValue::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
        parameters,
        request_body,
        response,
        consumes,
        produces,
        diagnostics,
    })
}

/// Prefer JSON, otherwise the first media type in sorted order.
fn pick_media_type(content: &Map<String, JsonValue>) -> Option<(&String, &JsonValue)> {
    content
        .get_key_value(JSON_MEDIA_TYPE)
        .or_else(|| content.iter().next())
}

#[allow(clippy::too_many_arguments)]
fn extract_parameters(
    spec: &OpenApiContext,
    walker: &mut SchemaWalker<'_>,
    item: &Map<String, JsonValue>,
    op: &Map<String, JsonValue>,
    path: &str,
    location: &str,
    type_prefix: &str,
    diagnostics: &mut Vec<String>,
) -> Result<Vec<Parameter>> {
    let item_location = format!("#/paths/{}/parameters", escape_pointer_token(path));
    let op_location = format!("{}/parameters", location);

    // (pointer, raw parameter) in declaration order, operation entries replacing path ones
    let mut declared: Vec<(String, &JsonValue)> = Vec::new();
    let sources = [
        (item.get("parameters"), item_location.as_str()),
        (op.get("parameters"), op_location.as_str()),
    ];
    for (list, base) in sources {
        let Some(list) = list.and_then(JsonValue::as_array) else {
            continue;
        };
        for (i, raw) in list.iter().enumerate() {
            let pointer = format!("{}/{}", base, i);
            let resolved = spec.deref(raw)?;
            let key = parameter_key(resolved);
            match declared
                .iter()
                .position(|(_, existing)| parameter_key(existing) == key)
            {
                Some(index) => declared[index] = (pointer, resolved),
                None => declared.push((pointer, resolved)),
            }
        }
    }

    let mut parameters = Vec::with_capacity(declared.len());
    for (pointer, raw) in declared {
        let name = raw
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::specification(&pointer, "parameter without a name"))?;
        let location_value = raw.get("in").and_then(JsonValue::as_str).unwrap_or("");
        let param_location = ParameterLocation::parse(location_value).ok_or_else(|| {
            Error::specification(
                &pointer,
                format!("unknown parameter location '{}'", location_value),
            )
        })?;

        let type_ref = match raw.get("schema") {
            Some(schema) => walker.type_ref(
                schema,
                &format!("{}{}", type_prefix, java_class_name(name)),
                &format!("{}/schema", pointer),
            )?,
            None => {
                if raw.get("content").is_some() {
                    let message =
                        format!("parameter '{}' uses 'content'; mapped to String", name);
                    walker.report(format!("{}/content", pointer), message.clone());
                    diagnostics.push(message);
                }
                TypeRef::string()
            }
        };

        parameters.push(Parameter {
            field_name: java_field_name(name),
            name: name.to_string(),
            required: param_location == ParameterLocation::Path
                || raw
                    .get("required")
                    .and_then(JsonValue::as_bool)
                    .unwrap_or(false),
            location: param_location,
            type_ref,
            description: raw
                .get("description")
                .and_then(JsonValue::as_str)
                .map(String::from),
        });
    }

    // Path parameters first, declaration order otherwise
    parameters.sort_by_key(|p| p.location != ParameterLocation::Path);

    // Java argument names must be unique
    let mut seen: Vec<String> = Vec::new();
    for param in &mut parameters {
        let base = param.field_name.clone();
        let mut counter = 2;
        while seen.contains(&param.field_name) {
            param.field_name = format!("{}{}", base, counter);
            counter += 1;
        }
        seen.push(param.field_name.clone());
    }
    Ok(parameters)
}

fn parameter_key(raw: &JsonValue) -> (Option<&str>, Option<&str>) {
    (
        raw.get("name").and_then(JsonValue::as_str),
        raw.get("in").and_then(JsonValue::as_str),
    )
}

/// Pick the success response: lowest 2xx with content, then `default`, then lowest bare 2xx.
fn extract_response(
    spec: &OpenApiContext,
    walker: &mut SchemaWalker<'_>,
    responses: &Map<String, JsonValue>,
    location: &str,
    type_prefix: &str,
) -> Result<(Option<ResponseBody>, Vec<String>)> {
    let mut with_content: Option<(&String, &JsonValue)> = None;
    let mut without_content: Option<&String> = None;

    // Keys iterate sorted, so the first match is the lowest code
    for (status, response) in responses.iter().filter(|(k, _)| k.starts_with('2')) {
        let response = spec.deref(response)?;
        if has_content(response) {
            if with_content.is_none() {
                with_content = Some((status, response));
            }
        } else if without_content.is_none() {
            without_content = Some(status);
        }
    }
    if with_content.is_none() {
        if let Some(response) = responses.get_key_value("default") {
            let resolved = spec.deref(response.1)?;
            if has_content(resolved) {
                with_content = Some((response.0, resolved));
            }
        }
    }

    let Some((status, response)) = with_content else {
        return Ok((
            without_content.map(|status| ResponseBody {
                status: status.clone(),
                type_ref: None,
                media_type: None,
            }),
            Vec::new(),
        ));
    };

    let Some(content) = response.get("content").and_then(JsonValue::as_object) else {
        return Ok((None, Vec::new()));
    };
    let produces: Vec<String> = content.keys().cloned().collect();
    let Some((media_type, media)) = pick_media_type(content) else {
        return Ok((None, produces));
    };
    let type_ref = match media.get("schema") {
        Some(schema) => Some(walker.type_ref(
            schema,
            &format!("{}Response", type_prefix),
            &format!(
                "{}/responses/{}/content/{}/schema",
                location,
                escape_pointer_token(status),
                escape_pointer_token(media_type)
            ),
        )?),
        None => None,
    };

    Ok((
        Some(ResponseBody {
            status: status.clone(),
            type_ref,
            media_type: Some(media_type.clone()),
        }),
        produces,
    ))
}

fn has_content(response: &JsonValue) -> bool {
    response
        .get("content")
        .and_then(JsonValue::as_object)
        .is_some_and(|c| !c.is_empty())
}

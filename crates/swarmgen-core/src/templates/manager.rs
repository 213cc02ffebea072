//! Template system for project generation

// Internal imports (std, crate)
use std::{collections::HashMap, sync::Arc};

use crate::{
    builders::{ContextBuilder, JavaContextBuilder, java},
    error::{Error, Result},
    manifest::{TemplateFile, TemplateManifest},
    model::GenerationModel,
    settings::ProjectSettings,
};

use super::{GenerationMode, RenderedFileSet};

// External imports (alphabetized)
use serde_json::{Map, Value as JsonValue};
use tera::{Context, Tera};

const MANIFEST: &str = include_str!("../../templates/thorntail/manifest.yaml");

/// Template sources compiled into the binary, keyed by manifest `source`
const TEMPLATES: &[(&str, &str)] = &[
    (
        "pom.xml.tera",
        include_str!("../../templates/thorntail/pom.xml.tera"),
    ),
    (
        "README.md.tera",
        include_str!("../../templates/thorntail/README.md.tera"),
    ),
    (
        "gitignore.tera",
        include_str!("../../templates/thorntail/gitignore.tera"),
    ),
    (
        "JaxRsApplication.java.tera",
        include_str!("../../templates/thorntail/JaxRsApplication.java.tera"),
    ),
    (
        "Resource.java.tera",
        include_str!("../../templates/thorntail/Resource.java.tera"),
    ),
    (
        "Bean.java.tera",
        include_str!("../../templates/thorntail/Bean.java.tera"),
    ),
    (
        "project-defaults.yml.tera",
        include_str!("../../templates/thorntail/project-defaults.yml.tera"),
    ),
    (
        "api-contract.json.tera",
        include_str!("../../templates/thorntail/api-contract.json.tera"),
    ),
];

/// Manages loading and rendering of the project templates
#[derive(Clone)]
pub struct TemplateManager {
    /// Compiled Tera template engine instance
    tera: Arc<Tera>,
    /// The template manifest
    manifest: TemplateManifest,
    /// Turns model entities into template contexts
    builder: Arc<dyn ContextBuilder>,
}

impl std::fmt::Debug for TemplateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateManager")
            .field("manifest", &self.manifest.name)
            .finish_non_exhaustive()
    }
}

impl TemplateManager {
    /// Create a TemplateManager over the embedded Thorntail templates
    pub fn new() -> Result<Self> {
        let manifest = TemplateManifest::from_yaml(MANIFEST)?;

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .map_err(|e| Error::template(format!("Failed to parse templates: {}", e)))?;
        tera.register_filter("java_string", java_string_filter);
        tera.register_filter("xml", xml_filter);

        let manager = TemplateManager {
            tera: Arc::new(tera),
            manifest,
            builder: Arc::new(JavaContextBuilder),
        };

        if let Some(missing) = manager
            .manifest
            .files
            .iter()
            .find(|f| !manager.has_template(&f.source))
        {
            return Err(Error::template(format!(
                "Template not found: {}",
                missing.source
            )));
        }
        log::debug!(
            "Loaded {} templates for manifest '{}'",
            TEMPLATES.len(),
            manager.manifest.name
        );
        Ok(manager)
    }

    /// Get a reference to the template manifest
    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    /// Check if a template exists
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template(name).is_ok()
    }

    /// List `(source, destination)` pairs emitted in a mode
    pub fn list_templates(&self, mode: GenerationMode) -> Vec<(String, String)> {
        self.manifest
            .files
            .iter()
            .filter(|f| f.applies_to(mode))
            .map(|f| (f.source.clone(), f.destination.clone()))
            .collect()
    }

    /// Render every file the manifest lists for `mode`.
    ///
    /// Settings are validated before any template renders.
    pub fn render(
        &self,
        model: &GenerationModel,
        settings: &ProjectSettings,
        mode: GenerationMode,
    ) -> Result<RenderedFileSet> {
        settings.validate()?;

        let base_context = self.builder.project(model, settings)?;
        let base_map = base_context
            .as_object()
            .ok_or_else(|| Error::template("Context must be a JSON object"))?;
        let keys: Vec<&str> = base_map.keys().map(String::as_str).collect();
        log::debug!("Template context keys: {}", keys.join(", "));

        let mut files = RenderedFileSet::new();
        for file in self.manifest.files.iter().filter(|f| f.applies_to(mode)) {
            log::debug!("Processing file: {} -> {}", file.source, file.destination);
            match file.for_each.as_deref() {
                None => {
                    self.render_file(file, base_map, None, &mut files)?;
                }
                Some("resource") => {
                    for resource in &model.resources {
                        let ctx = self.builder.resource(resource, settings)?;
                        self.render_file(file, base_map, Some(("resource", ctx)), &mut files)?;
                    }
                }
                Some("data_type") => {
                    for data_type in &model.data_types {
                        let ctx = self.builder.data_type(data_type, settings)?;
                        self.render_file(file, base_map, Some(("data_type", ctx)), &mut files)?;
                    }
                }
                Some(other) => {
                    return Err(Error::template(format!(
                        "Unknown for_each directive: {}",
                        other
                    )));
                }
            }
        }

        log::debug!("Rendered {} files in {} mode", files.len(), mode);
        Ok(files)
    }

    fn render_file(
        &self,
        file: &TemplateFile,
        base: &Map<String, JsonValue>,
        entity: Option<(&str, JsonValue)>,
        files: &mut RenderedFileSet,
    ) -> Result<()> {
        let mut tera_context = Context::new();
        for (key, value) in base {
            tera_context.insert(key, value);
        }
        if let JsonValue::Object(extra) = &file.context {
            for (key, value) in extra {
                tera_context.insert(key, value);
            }
        }
        if let Some((key, value)) = entity {
            tera_context.insert(key, &value);
        }

        let destination = Tera::one_off(&file.destination, &tera_context, false).map_err(|e| {
            Error::template(format!(
                "Failed to render destination '{}': {}",
                file.destination, e
            ))
        })?;

        let rendered = self.tera.render(&file.source, &tera_context).map_err(|e| {
            log::error!("Tera rendering error for {}: {:?}", file.source, e);
            Error::template(format!("Failed to render template '{}': {}", file.source, e))
        })?;

        log::debug!("Rendered {} ({} bytes)", destination, rendered.len());
        files.insert(destination, normalize(&rendered))
    }
}

/// `\n` line endings, no trailing spaces, no runs of blank lines, one final newline.
pub(crate) fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    let mut previous_blank = true;
    for line in text.replace("\r\n", "\n").split('\n') {
        let line = line.trim_end();
        if line.is_empty() {
            if previous_blank {
                continue;
            }
            previous_blank = true;
        } else {
            previous_blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

fn java_string_filter(value: &JsonValue, _: &HashMap<String, JsonValue>) -> tera::Result<JsonValue> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("Filter `java_string` expects a string"))?;
    Ok(JsonValue::String(java::java_string_literal(s)))
}

fn xml_filter(value: &JsonValue, _: &HashMap<String, JsonValue>) -> tera::Result<JsonValue> {
    let s = match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(JsonValue::String(java::xml_escape(&s)))
}

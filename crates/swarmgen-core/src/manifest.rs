//! Manifest file format for the project templates.
//!
//! This module defines the structure of the `manifest.yaml` file that describes
//! which files a template set generates, and in which generation modes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_value::Value as SerdeValue;

use crate::templates::GenerationMode;

/// The root manifest structure for a template set.
///
/// This describes the template set's metadata and the files it contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// The name of the template set
    pub name: String,

    /// A short description of what the template set generates
    pub description: String,

    /// The version of the template set (should follow semantic versioning)
    pub version: String,

    /// The target programming language
    pub language: String,

    /// List of files to generate
    pub files: Vec<TemplateFile>,
}

/// Describes a single file to be generated from a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFile {
    /// Name of the template
    pub source: String,

    /// Destination path for the generated file; rendered with the file's context
    pub destination: String,

    /// Optional directive for generating one file per entity (`resource` or `data_type`)
    #[serde(default)]
    pub for_each: Option<String>,

    /// Additional context to pass to the template
    #[serde(default)]
    pub context: serde_json::Value,

    /// Generation modes that emit this file; all modes when omitted
    #[serde(default = "all_modes", deserialize_with = "deserialize_modes")]
    pub modes: Vec<GenerationMode>,
}

impl Default for TemplateFile {
    fn default() -> Self {
        Self {
            source: String::new(),
            destination: String::new(),
            for_each: None,
            context: serde_json::Value::Null,
            modes: all_modes(),
        }
    }
}

impl TemplateFile {
    /// Whether a run in `mode` emits this file
    pub fn applies_to(&self, mode: GenerationMode) -> bool {
        self.modes.contains(&mode)
    }
}

impl TemplateManifest {
    /// Parse a manifest from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a valid manifest.
    pub fn from_yaml(content: &str) -> Result<Self, crate::Error> {
        serde_yaml::from_str(content)
            .map_err(|e| crate::Error::Template(format!("Invalid YAML in template manifest: {}", e)))
    }
}

fn all_modes() -> Vec<GenerationMode> {
    GenerationMode::all().collect()
}

/// Helper function to deserialize either a single mode or a list of modes
fn deserialize_modes<'de, D>(deserializer: D) -> Result<Vec<GenerationMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = SerdeValue::deserialize(deserializer)?;

    let parse = |s: &str| -> Result<GenerationMode, D::Error> {
        s.parse::<GenerationMode>().map_err(serde::de::Error::custom)
    };
    match value {
        SerdeValue::String(s) => Ok(vec![parse(&s)?]),
        SerdeValue::Seq(seq) => {
            let mut result = Vec::new();
            for item in seq {
                if let SerdeValue::String(s) = item {
                    result.push(parse(&s)?);
                } else {
                    return Err(serde::de::Error::custom(
                        "Expected string or array of strings",
                    ));
                }
            }
            Ok(result)
        }
        _ => Err(serde::de::Error::custom(
            "Expected string or array of strings",
        )),
    }
}

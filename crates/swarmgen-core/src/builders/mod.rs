//! Context builder traits for the project templates.
pub mod java;

use crate::model::{DataType, GenerationModel, Resource};
use crate::settings::ProjectSettings;
use serde_json::Value as JsonValue;

pub use java::JavaContextBuilder;

/// Trait for converting parts of a [`GenerationModel`] into template contexts.
///
/// Every method returns a JSON object; the template manager merges the
/// project context into each per-entity context.
pub trait ContextBuilder: Send + Sync {
    /// Context shared by every rendered file
    fn project(&self, model: &GenerationModel, settings: &ProjectSettings)
    -> crate::Result<JsonValue>;

    /// Context for one resource class, inserted as `resource`
    fn resource(&self, resource: &Resource, settings: &ProjectSettings)
    -> crate::Result<JsonValue>;

    /// Context for one model class, inserted as `data_type`
    fn data_type(&self, data_type: &DataType, settings: &ProjectSettings)
    -> crate::Result<JsonValue>;
}

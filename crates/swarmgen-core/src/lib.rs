//! Swarmgen Core Library
//!
//! This library turns an OpenAPI 3 document into a zipped Java (Thorntail /
//! JAX-RS, Maven) project skeleton: a normalized generation model is extracted
//! from the document, rendered through embedded templates, and bundled into a
//! byte-stable archive.

pub mod archive;
pub mod builders;
pub mod config;
pub mod error;
pub mod extract;
pub mod generate;
pub mod manifest;
pub mod model;
pub mod naming;
pub mod openapi;
pub mod settings;
pub mod templates;

pub use crate::{
    config::Config,
    error::{Error, Result},
    extract::extract,
    generate::{
        CachedModelSource, DeriveFromSpec, GenerationOutput, Generator, ModelSource,
        SuppliedModel, generate,
    },
    model::{Diagnostic, GenerationModel},
    openapi::{OpenApiContext, SpecReference},
    settings::{ProjectSettings, ProjectSettingsOverrides},
    templates::{GenerationMode, RenderedFileSet, TemplateManager},
};

//! Generation pipeline: specification -> model -> rendered files -> zip.
//!
//! A [`Generator`] owns the run configuration, the embedded templates and the
//! [`ModelSource`] that supplies the generation model. The default source
//! extracts the model from the specification; a pre-built model can be
//! injected with [`SuppliedModel`], and any source can be memoized with
//! [`CachedModelSource`].

// Internal imports (std, crate)
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::{
    archive,
    config::Config,
    error::{Error, Result},
    extract::extract,
    model::{Diagnostic, GenerationModel},
    openapi::{OpenApiContext, SpecReference},
    settings::{self, ProjectSettings, ProjectSettingsOverrides},
    templates::{GenerationMode, TemplateManager},
};

/// Supplies the generation model for a run.
pub trait ModelSource: Send + Sync + fmt::Debug {
    /// Whether [`ModelSource::model`] needs the loaded specification.
    fn requires_document(&self) -> bool {
        true
    }

    /// Produce the model. `spec` is `None` only when the source does not
    /// require a document.
    fn model(&self, spec: Option<&OpenApiContext>) -> Result<Arc<GenerationModel>>;
}

fn required(spec: Option<&OpenApiContext>) -> Result<&OpenApiContext> {
    spec.ok_or_else(|| Error::config("model source requires a loaded specification"))
}

/// Extracts a fresh model from the specification on every run
#[derive(Debug, Default, Clone, Copy)]
pub struct DeriveFromSpec;

impl ModelSource for DeriveFromSpec {
    fn model(&self, spec: Option<&OpenApiContext>) -> Result<Arc<GenerationModel>> {
        extract(required(spec)?).map(Arc::new)
    }
}

/// A pre-built model injected in place of extraction
#[derive(Debug, Clone)]
pub struct SuppliedModel {
    model: Arc<GenerationModel>,
}

impl SuppliedModel {
    /// Wrap a model after checking its invariants
    pub fn new(model: GenerationModel) -> Result<Self> {
        model.validate()?;
        Ok(Self {
            model: Arc::new(model),
        })
    }

    /// Parse a pre-serialized model
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self {
            model: Arc::new(GenerationModel::from_json(json)?),
        })
    }

    /// Read a pre-serialized model from disk
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading generation model from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }
}

impl ModelSource for SuppliedModel {
    fn requires_document(&self) -> bool {
        false
    }

    fn model(&self, _spec: Option<&OpenApiContext>) -> Result<Arc<GenerationModel>> {
        Ok(Arc::clone(&self.model))
    }
}

/// Memoizes another source, keyed by the SHA-256 of the canonical document.
///
/// Cached models are immutable; concurrent misses for the same key keep the
/// first inserted value.
pub struct CachedModelSource<S> {
    inner: S,
    cache: RwLock<HashMap<String, Arc<GenerationModel>>>,
}

impl<S: ModelSource> CachedModelSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached models
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: fmt::Debug> fmt::Debug for CachedModelSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedModelSource")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S: ModelSource> ModelSource for CachedModelSource<S> {
    fn model(&self, spec: Option<&OpenApiContext>) -> Result<Arc<GenerationModel>> {
        let key = required(spec)?.content_hash();

        if let Some(model) = self
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            log::debug!("Model cache hit for {}", key);
            return Ok(Arc::clone(model));
        }

        let model = self.inner.model(spec)?;
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        Ok(Arc::clone(cache.entry(key).or_insert(model)))
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// The zip archive bytes
    pub archive: Vec<u8>,
    /// Relative paths of the files in the archive, sorted
    pub files: Vec<String>,
    /// Non-fatal issues collected while building the model
    pub diagnostics: Vec<Diagnostic>,
    /// The identifiers the project was rendered with
    pub settings: ProjectSettings,
}

impl GenerationOutput {
    /// Atomically write the archive to `path`
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        archive::write_archive(path.as_ref(), &self.archive)
    }
}

/// Runs the generation pipeline
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
    source: Arc<dyn ModelSource>,
    templates: TemplateManager,
}

impl Generator {
    /// Create a generator that extracts the model from the specification
    pub fn new(config: Config) -> Result<Self> {
        Self::with_source(config, Arc::new(DeriveFromSpec))
    }

    /// Create a generator with an explicit model source
    pub fn with_source(config: Config, source: Arc<dyn ModelSource>) -> Result<Self> {
        Ok(Self {
            config,
            source,
            templates: TemplateManager::new()?,
        })
    }

    /// Create a generator from a config, injecting `model_path` when set
    pub async fn from_config(config: Config) -> Result<Self> {
        match config.model_path.clone() {
            Some(path) => {
                let source = SuppliedModel::from_file(&path).await?;
                Self::with_source(config, Arc::new(source))
            }
            None => Self::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Obtain the generation model for `spec` from the configured source.
    ///
    /// The document is only loaded when the source needs it. In strict mode
    /// the first diagnostic is raised as an error.
    pub async fn model(&self, spec: &SpecReference) -> Result<Arc<GenerationModel>> {
        let document = if self.source.requires_document() {
            Some(OpenApiContext::load(spec).await?)
        } else {
            None
        };
        let model = self.source.model(document.as_ref())?;

        for diagnostic in &model.diagnostics {
            log::warn!("{}", diagnostic);
        }
        if self.config.strict {
            if let Some(diagnostic) = model.diagnostics.first() {
                return Err(diagnostic.clone().into_error());
            }
        }
        Ok(model)
    }

    /// Run the whole pipeline.
    ///
    /// `overrides` take precedence over the identifiers in the config.
    pub async fn generate(
        &self,
        spec: &SpecReference,
        overrides: Option<&ProjectSettingsOverrides>,
        mode: GenerationMode,
    ) -> Result<GenerationOutput> {
        let model = self.model(spec).await?;

        let config_overrides = self.config.overrides();
        let settings = settings::resolve(
            overrides.or(config_overrides.as_ref()),
            &model,
            self.config.organization.as_deref(),
        )?;

        log::info!(
            "Rendering {} ({} mode): {} resources, {} data types",
            settings.artifact_id,
            mode,
            model.resources.len(),
            model.data_types.len()
        );
        let rendered = self.templates.render(&model, &settings, mode)?;
        let files = rendered.paths().map(String::from).collect();
        let archive = archive::assemble(&rendered)?;

        Ok(GenerationOutput {
            archive,
            files,
            diagnostics: model.diagnostics.clone(),
            settings,
        })
    }

    /// Run the pipeline and return only the archive bytes
    pub async fn generate_archive(
        &self,
        spec: &SpecReference,
        overrides: Option<&ProjectSettingsOverrides>,
        mode: GenerationMode,
    ) -> Result<Vec<u8>> {
        Ok(self.generate(spec, overrides, mode).await?.archive)
    }
}

/// Generate a project archive with the default configuration
pub async fn generate(
    spec: &SpecReference,
    overrides: Option<&ProjectSettingsOverrides>,
    mode: GenerationMode,
) -> Result<Vec<u8>> {
    Generator::new(Config::default())?
        .generate_archive(spec, overrides, mode)
        .await
}

//! Configuration management for swarmgen project generation.
//!
//! This module defines the `Config` struct holding the options of a generation
//! run. The configuration can be loaded from a YAML, JSON or TOML file, created
//! programmatically, or filled from command-line arguments.
//!
//! # Examples
//!
//! ```no_run
//! use swarmgen_core::config::Config;
//! use swarmgen_core::templates::GenerationMode;
//!
//! // Create a new config programmatically
//! let mut config = Config::new("beer-api.json");
//! config.mode = GenerationMode::ContractOnly;
//! config.organization = Some("com.acme".to_string());
//!
//! // Or load from a config file
//! # async fn load() -> swarmgen_core::Result<()> {
//! let config = Config::from_file("swarmgen.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use crate::{error::Error, settings::ProjectSettingsOverrides, templates::GenerationMode};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SWARMGEN_CONFIG";
/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "swarmgen.yaml";

/// Configuration for a swarmgen generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path or URL of the OpenAPI document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_location: Option<String>,

    /// Where to write the archive; `<artifactId>.zip` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    /// Which file subset to generate
    #[serde(default)]
    pub mode: GenerationMode,

    /// Maven group id override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    /// Maven artifact id override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,

    /// Java base package override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_package: Option<String>,

    /// Organization prefix used when deriving group id and package (`com.acme`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Pre-serialized generation model to render instead of extracting one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,

    /// Fail on any unsupported construct instead of emitting placeholders
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

impl Config {
    /// Create a new Config for a specification with default values
    pub fn new(spec_location: impl Into<String>) -> Self {
        Self {
            spec_location: Some(spec_location.into()),
            ..Default::default()
        }
    }

    /// Settings overrides carried by this config, if any field is set
    pub fn overrides(&self) -> Option<ProjectSettingsOverrides> {
        if self.group_id.is_none() && self.artifact_id.is_none() && self.base_package.is_none() {
            return None;
        }
        Some(ProjectSettingsOverrides {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            base_package: self.base_package.clone(),
        })
    }

    /// Load configuration from a file; the format follows the extension (YAML by default)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).await?;
        let config = match ConfigFormat::from_path(path) {
            ConfigFormat::Yaml => serde_yaml::from_str(&content)?,
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| {
                Error::config(format!("Invalid TOML in {}: {}", path.display(), e))
            })?,
        };
        Ok(config)
    }

    /// Save configuration to a file; the format follows the extension (YAML by default)
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path) {
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?,
        };
        fs::write(path, content).await?;
        Ok(())
    }

    /// Locate a config file: `$SWARMGEN_CONFIG`, then `./swarmgen.yaml`, then
    /// `~/.swarmgen/config.yaml`.
    pub fn discover() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.is_file() {
                return Some(path);
            }
            log::warn!(
                "{} points to a missing file: {}",
                CONFIG_ENV_VAR,
                path.display()
            );
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }

        dirs::home_dir()
            .map(|home| home.join(".swarmgen").join("config.yaml"))
            .filter(|path| path.is_file())
    }
}

//! Error handling for the swarmgen generation pipeline.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! Every variant except `UnsupportedConstruct` is fatal for a run. Unsupported
//! constructs are normally recorded as [`crate::model::Diagnostic`]s and only
//! surface as an error when the generator runs in strict mode.
//!
//! # Examples
//!
//! ```
//! use swarmgen_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::specification("#/info/title", "missing title"))
//! }
//!
//! assert!(matches!(might_fail(), Err(Error::SpecificationInvalid { .. })));
//! ```

use thiserror::Error;

/// Result type for swarmgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for swarmgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// The specification could not be turned into a complete object graph
    #[error("Invalid specification at {location}: {message}")]
    SpecificationInvalid { location: String, message: String },

    /// A specification feature has no generator mapping (strict mode only)
    #[error("Unsupported construct at {location}: {message}")]
    UnsupportedConstruct { location: String, message: String },

    /// A project identifier is unusable
    #[error("Invalid project setting '{field}' = '{value}': {reason}")]
    SettingsInvalid {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Writing the archive failed; no archive was produced
    #[error("Archive write failure: {0}")]
    ArchiveWriteFailure(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template error
    #[error("Template error: {0}")]
    Template(String),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new specification error
    pub fn specification<L: Into<String>, S: Into<String>>(location: L, msg: S) -> Self {
        Self::SpecificationInvalid {
            location: location.into(),
            message: msg.into(),
        }
    }

    /// Create a new unsupported-construct error
    pub fn unsupported<L: Into<String>, S: Into<String>>(location: L, msg: S) -> Self {
        Self::UnsupportedConstruct {
            location: location.into(),
            message: msg.into(),
        }
    }

    /// Create a new settings error
    pub fn settings<V: Into<String>, S: Into<String>>(
        field: &'static str,
        value: V,
        reason: S,
    ) -> Self {
        Self::SettingsInvalid {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    /// Whether this error aborts a generation run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnsupportedConstruct { .. })
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::ArchiveWriteFailure(e.to_string())
    }
}

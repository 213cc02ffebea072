//! OpenAPI specification loading and lookup.
//!
//! This module resolves a [`SpecReference`] into an in-memory document and
//! offers the lookups the extractor needs: structural validation against the
//! typed OpenAPI 3 object graph, JSON-pointer resolution of internal `$ref`s,
//! and convenient accessors for document metadata.
//!
//! # Examples
//!
//! ```no_run
//! use swarmgen_core::openapi::OpenApiContext;
//! use swarmgen_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! // Load an OpenAPI spec from a file
//! let spec = OpenApiContext::from_file("beer-api.json").await?;
//!
//! // Access common fields
//! if let Some(title) = spec.title() {
//!     println!("API Title: {}", title);
//! }
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::error::{Error, Result};

// External imports (alphabetized)
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use tokio::fs;
use url::Url;

/// Locator for the source OpenAPI document.
#[derive(Debug, Clone)]
pub enum SpecReference {
    /// An already parsed document tree
    Document(JsonValue),
    /// Raw JSON or YAML text
    Text(String),
    /// A local file path or an HTTP(S) URL
    Location(String),
}

impl SpecReference {
    /// Build a reference from a path or URL string
    pub fn location(location: impl Into<String>) -> Self {
        Self::Location(location.into())
    }
}

impl From<JsonValue> for SpecReference {
    fn from(json: JsonValue) -> Self {
        Self::Document(json)
    }
}

/// Represents an OpenAPI specification
#[derive(Debug, Clone, serde::Serialize)]
#[serde(transparent)]
pub struct OpenApiContext {
    /// The raw JSON value of the OpenAPI spec
    pub json: JsonValue,
}

impl OpenApiContext {
    /// Wrap an already parsed document
    pub fn from_json(json: JsonValue) -> Self {
        Self { json }
    }

    /// Resolve any kind of [`SpecReference`]
    pub async fn load(reference: &SpecReference) -> Result<Self> {
        match reference {
            SpecReference::Document(json) => Ok(Self::from_json(json.clone())),
            SpecReference::Text(text) => Self::from_text(text),
            SpecReference::Location(location) => Self::from_file_or_url(location).await,
        }
    }

    /// Create a new spec from a file or URL (supports both YAML and JSON)
    pub async fn from_file_or_url<P: AsRef<str>>(location: P) -> Result<Self> {
        let location = location.as_ref();

        // Check if the input looks like a URL
        if location.starts_with("http://") || location.starts_with("https://") {
            return Self::from_url(location).await;
        }

        // Otherwise treat as a file path
        Self::from_file(location).await
    }

    /// Create a new spec from a file (supports both YAML and JSON)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading OpenAPI document from {}", path.display());
        let content = fs::read_to_string(path).await?;
        Self::parse_content(&content).map_err(|e| {
            Error::specification(
                path.display().to_string(),
                format!("failed to parse OpenAPI document: {}", e),
            )
        })
    }

    /// Create a new spec from a URL (supports both YAML and JSON)
    pub async fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::specification(url, format!("invalid URL: {}", e)))?;
        log::debug!("Fetching OpenAPI document from {}", url);

        let response = reqwest::get(url.clone()).await.map_err(|e| {
            Error::specification(url.as_str(), format!("failed to fetch document: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(Error::specification(
                url.as_str(),
                format!("failed to fetch document: HTTP {}", response.status()),
            ));
        }

        let content = response.text().await.map_err(|e| {
            Error::specification(url.as_str(), format!("failed to read response: {}", e))
        })?;

        Self::parse_content(&content).map_err(|e| {
            Error::specification(
                url.as_str(),
                format!("failed to parse OpenAPI document: {}", e),
            )
        })
    }

    /// Create a new spec from raw JSON or YAML text
    pub fn from_text(content: &str) -> Result<Self> {
        Self::parse_content(content).map_err(|e| {
            Error::specification("#", format!("failed to parse OpenAPI document: {}", e))
        })
    }

    /// Parse content as either JSON or YAML
    fn parse_content(content: &str) -> std::result::Result<Self, String> {
        // Try to parse as JSON first
        if let Ok(json) = serde_json::from_str(content) {
            return Ok(Self { json });
        }

        // If JSON parsing fails, try YAML
        if let Ok(json) = serde_yaml::from_str::<JsonValue>(content) {
            if json.is_object() {
                return Ok(Self { json });
            }
        }

        Err("content is neither a valid JSON nor a valid YAML object".to_string())
    }

    /// Get a reference to the raw JSON value
    pub fn as_json(&self) -> &JsonValue {
        &self.json
    }

    /// Get the title of the API
    pub fn title(&self) -> Option<&str> {
        self.json.get("info")?.get("title")?.as_str()
    }

    /// Get the version of the API
    pub fn version(&self) -> Option<&str> {
        self.json.get("info")?.get("version")?.as_str()
    }

    /// Get the description of the API
    pub fn description(&self) -> Option<&str> {
        self.json.get("info")?.get("description")?.as_str()
    }

    /// Path component of the first declared server (`https://x.io/api/v1` -> `/api/v1`)
    pub fn server_path(&self) -> Option<String> {
        let url = self
            .json
            .get("servers")?
            .as_array()?
            .first()?
            .get("url")?
            .as_str()?;

        if url.starts_with('/') {
            return Some(url.trim_end_matches('/').to_string()).filter(|p| !p.is_empty());
        }

        Url::parse(url)
            .ok()
            .map(|u| u.path().trim_end_matches('/').to_string())
            .filter(|p| !p.is_empty())
    }

    /// SHA-256 of the canonical JSON form of the document, used as a cache key
    pub fn content_hash(&self) -> String {
        let canonical = self.json.to_string();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Check the document is a complete OpenAPI 3 object graph.
    ///
    /// The typed graph is only used for validation and metadata; the extractor
    /// walks the raw tree so that constructs without a generator mapping can be
    /// recorded instead of rejected.
    pub fn validate(&self) -> Result<openapiv3::OpenAPI> {
        let root = self
            .json
            .as_object()
            .ok_or_else(|| Error::specification("#", "document root must be an object"))?;

        match root.get("openapi").and_then(JsonValue::as_str) {
            Some(version) if version.starts_with("3.") => {}
            Some(version) => {
                return Err(Error::specification(
                    "#/openapi",
                    format!("unsupported OpenAPI version '{}', expected 3.x", version),
                ));
            }
            None => {
                return Err(Error::specification(
                    "#/openapi",
                    "missing 'openapi' version field (only OpenAPI 3.x documents are supported)",
                ));
            }
        }

        let info = root
            .get("info")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| Error::specification("#/info", "missing 'info' object"))?;
        match info.get("title").and_then(JsonValue::as_str) {
            Some(title) if !title.trim().is_empty() => {}
            _ => return Err(Error::specification("#/info/title", "missing API title")),
        }
        if !root.get("paths").is_some_and(JsonValue::is_object) {
            return Err(Error::specification("#/paths", "missing 'paths' object"));
        }

        serde_json::from_value::<openapiv3::OpenAPI>(self.json.clone())
            .map_err(|e| Error::specification("#", format!("malformed OpenAPI document: {}", e)))
    }

    /// Resolve an internal reference (`#/components/schemas/Beer`).
    pub fn resolve_ref(&self, reference: &str) -> Result<&JsonValue> {
        let pointer = reference.strip_prefix('#').ok_or_else(|| {
            Error::specification(reference, "only internal references can be resolved")
        })?;
        self.json
            .pointer(pointer)
            .ok_or_else(|| Error::specification(reference, "unresolved reference"))
    }

    /// Follow `$ref` chains until a concrete object is reached.
    pub fn deref<'a>(&'a self, value: &'a JsonValue) -> Result<&'a JsonValue> {
        let mut current = value;
        let mut hops = 0;
        while let Some(reference) = current.get("$ref").and_then(JsonValue::as_str) {
            hops += 1;
            if hops > 32 {
                return Err(Error::specification(reference, "reference chain too long"));
            }
            current = self.resolve_ref(reference)?;
        }
        Ok(current)
    }

    /// The `components.schemas` map, if any
    pub fn schemas(&self) -> Option<&serde_json::Map<String, JsonValue>> {
        self.json
            .get("components")?
            .get("schemas")?
            .as_object()
    }
}

/// Escape a single JSON pointer token (`/beers/{id}` -> `~1beers~1{id}`).
pub fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn minimal() -> JsonValue {
        json!({
            "openapi": "3.0.2",
            "info": { "title": "Beer API", "version": "1.0.0" },
            "servers": [{ "url": "https://api.example.com/v2/" }],
            "paths": {},
            "components": { "schemas": { "Beer": { "type": "object" } } }
        })
    }

    #[tokio::test]
    async fn test_from_file() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("openapi.json");
        tokio::fs::write(&file_path, minimal().to_string()).await?;

        let spec = OpenApiContext::from_file(&file_path).await?;
        assert_eq!(spec.title(), Some("Beer API"));
        assert_eq!(spec.version(), Some("1.0.0"));
        assert_eq!(spec.server_path(), Some("/v2".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_yaml_text() -> Result<()> {
        let yaml = "openapi: 3.0.0\ninfo:\n  title: Yaml API\n  version: '2'\npaths: {}\n";
        let spec = OpenApiContext::load(&SpecReference::Text(yaml.to_string())).await?;
        assert_eq!(spec.title(), Some("Yaml API"));
        assert!(spec.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_unparseable_text() {
        let err = OpenApiContext::from_text("just words").unwrap_err();
        assert!(matches!(err, Error::SpecificationInvalid { .. }));
    }

    #[test]
    fn test_validate_missing_title() {
        let mut json = minimal();
        json["info"].as_object_mut().unwrap().remove("title");
        let err = OpenApiContext::from_json(json).validate().unwrap_err();
        match err {
            Error::SpecificationInvalid { location, .. } => assert_eq!(location, "#/info/title"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_swagger2() {
        let json = json!({"swagger": "2.0", "info": {"title": "x", "version": "1"}, "paths": {}});
        assert!(OpenApiContext::from_json(json).validate().is_err());
    }

    #[test]
    fn test_resolve_ref() {
        let spec = OpenApiContext::from_json(minimal());
        assert_eq!(
            spec.resolve_ref("#/components/schemas/Beer").unwrap(),
            &json!({"type": "object"})
        );
        assert!(spec.resolve_ref("#/components/schemas/Wine").is_err());
        assert!(spec.resolve_ref("other.json#/Beer").is_err());
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = OpenApiContext::from_json(minimal());
        let b = OpenApiContext::from_json(minimal());
        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash().len(), 64);
    }

    #[test]
    fn test_escape_pointer_token() {
        assert_eq!(escape_pointer_token("/beers/{id}"), "~1beers~1{id}");
    }
}

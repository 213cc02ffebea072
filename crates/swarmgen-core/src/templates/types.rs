//! Rendered output of a template run

// Internal imports (std, crate)
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// A single rendered project file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Relative path with forward slashes
    pub path: String,
    pub contents: Vec<u8>,
}

/// Rendered files keyed by relative path, iterated in path order.
///
/// Paths are unique, use forward slashes, and never escape the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFileSet {
    files: BTreeMap<String, Vec<u8>>,
}

impl RenderedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; invalid or duplicate paths are rejected.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Result<()> {
        let path = path.into();
        validate_path(&path)?;
        if self.files.contains_key(&path) {
            return Err(Error::template(format!("duplicate output path '{}'", path)));
        }
        self.files.insert(path, contents.into());
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Contents of a file as UTF-8 text
    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// `(path, contents)` pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_slice()))
    }
}

impl IntoIterator for RenderedFileSet {
    type Item = RenderedFile;
    type IntoIter = std::vec::IntoIter<RenderedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files
            .into_iter()
            .map(|(path, contents)| RenderedFile { path, contents })
            .collect::<Vec<_>>()
            .into_iter()
    }
}

fn validate_path(path: &str) -> Result<()> {
    let invalid = |reason: &str| Error::template(format!("invalid output path '{}': {}", path, reason));
    if path.is_empty() {
        return Err(invalid("empty"));
    }
    if path.starts_with('/') {
        return Err(invalid("absolute"));
    }
    if path.contains('\\') {
        return Err(invalid("backslash separator"));
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid("empty or relative segment"));
    }
    Ok(())
}

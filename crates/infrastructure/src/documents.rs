//! Existing documents read from disk.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;
use trawl_application::{DocumentSource, SourceError};
use trawl_domain::ExportFormat;

use crate::import::{ImportError, read_file};
use crate::serialization::decode_tree;

/// An `OpenAPI` or Swagger document stored as JSON or YAML.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    /// Creates a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format_hint(&self) -> Option<ExportFormat> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ExportFormat::from_extension)
    }
}

impl DocumentSource for DocumentFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Value, SourceError> {
        let content = read_file(&self.path)?;
        let tree = decode_tree(&content, self.format_hint()).map_err(|e| {
            ImportError::InvalidFormat {
                source_name: self.describe(),
                message: e.to_string(),
            }
        })?;
        debug!(path = %self.path.display(), "Loaded document");
        Ok(tree)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_load_yaml_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.yaml");
        std::fs::write(&path, "openapi: 3.0.3\ninfo:\n  title: A\n  version: '1'\npaths: {}\n").unwrap();

        let tree = DocumentFile::new(&path).load().unwrap();
        assert_eq!(
            tree,
            json!({ "openapi": "3.0.3", "info": { "title": "A", "version": "1" }, "paths": {} })
        );
    }

    #[test]
    fn test_json_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api");
        std::fs::write(&path, r#"{"swagger": "2.0"}"#).unwrap();

        assert_eq!(DocumentFile::new(&path).load().unwrap(), json!({ "swagger": "2.0" }));
    }

    #[test]
    fn test_undecodable_document_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.json");
        std::fs::write(&path, "{ nope").unwrap();

        let error = DocumentFile::new(&path).load().unwrap_err();
        assert!(matches!(error, SourceError::Parse { .. }));
    }

    #[test]
    fn test_missing_document_is_not_found() {
        let error = DocumentFile::new("/no/such/api.yaml").load().unwrap_err();
        assert!(matches!(error, SourceError::NotFound(_)));
    }
}

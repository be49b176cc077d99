//! Document serializer port

use serde_json::Value;
use trawl_domain::ExportFormat;

/// Errors that can occur while encoding a document.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML encoding failed.
    #[error("YAML error: {0}")]
    Yaml(String),
}

/// Turns a document tree into text.
pub trait DocumentSerializer {
    /// Encodes `document` in `format`.
    ///
    /// # Errors
    /// Returns an error if the document cannot be encoded.
    fn serialize(&self, document: &Value, format: ExportFormat) -> Result<String, SerializeError>;
}

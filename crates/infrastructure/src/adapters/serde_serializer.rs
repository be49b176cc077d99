//! Serde-backed document serializer adapter

use serde_json::Value;
use trawl_application::{DocumentSerializer, SerializeError};
use trawl_domain::ExportFormat;

use crate::serialization::encode;

/// Serializer using `serde_json` for JSON and `serde_yaml` for YAML.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeDocumentSerializer;

impl SerdeDocumentSerializer {
    /// Creates a new serializer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentSerializer for SerdeDocumentSerializer {
    fn serialize(&self, document: &Value, format: ExportFormat) -> Result<String, SerializeError> {
        encode(document, format).map_err(|e| match format {
            ExportFormat::Json => SerializeError::Json(e.to_string()),
            ExportFormat::Yaml => SerializeError::Yaml(e.to_string()),
        })
    }
}

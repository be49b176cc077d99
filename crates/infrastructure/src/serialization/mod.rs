//! Text encodings of generated documents.
//!
//! JSON output uses 2-space indentation and a trailing newline. YAML output
//! parses back to a tree deep-equal to the JSON output of the same value.

mod json;
mod yaml;

pub use json::*;
pub use yaml::*;

use serde_json::Value;
use std::io;
use trawl_domain::ExportFormat;

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    JsonEncode(serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    JsonDecode(serde_json::Error),

    /// YAML serialization failed.
    #[error("YAML serialization failed: {0}")]
    YamlEncode(serde_yaml::Error),

    /// YAML deserialization failed.
    #[error("YAML deserialization failed: {0}")]
    YamlDecode(serde_yaml::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Encodes `value` in `format`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode<T: serde::Serialize>(
    value: &T,
    format: ExportFormat,
) -> Result<String, SerializationError> {
    match format {
        ExportFormat::Json => to_json_pretty(value),
        ExportFormat::Yaml => to_yaml(value),
    }
}

/// Decodes a document tree from JSON or YAML text.
///
/// The format hint is tried first; without a hint JSON is tried before YAML.
/// YAML is a superset of JSON, so the fallback only matters for error
/// messages.
///
/// # Errors
///
/// Returns the error of the last attempted decoder.
pub fn decode_tree(text: &str, hint: Option<ExportFormat>) -> Result<Value, SerializationError> {
    match hint {
        Some(ExportFormat::Yaml) => from_yaml(text),
        Some(ExportFormat::Json) => from_json(text),
        None => from_json(text).or_else(|_| from_yaml(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_tree_without_hint() {
        assert_eq!(decode_tree("{\"a\": 1}", None).unwrap_or_default(), json!({ "a": 1 }));
        assert_eq!(decode_tree("a: 1\nb: [x]\n", None).unwrap_or_default(), json!({ "a": 1, "b": ["x"] }));
    }

    #[test]
    fn test_encode_matches_format() {
        let value = json!({ "openapi": "3.0.3" });
        assert!(encode(&value, ExportFormat::Json).unwrap_or_default().starts_with('{'));
        assert!(encode(&value, ExportFormat::Yaml).unwrap_or_default().starts_with("openapi:"));
    }
}

//! Generation options loaded from disk.

use std::path::Path;

use thiserror::Error;
use tracing::debug;
use trawl_domain::{ExportFormat, GenerationOptions};

use crate::serialization::{SerializationError, from_json, from_yaml};

/// Errors that can occur while loading options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// The file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file content is not valid options.
    #[error("Invalid config in {path}: {source}")]
    Invalid {
        /// Path of the file.
        path: String,
        /// Decoder error.
        source: SerializationError,
    },
}

/// Loads options from a JSON or YAML file.
///
/// `.yaml` and `.yml` files are read as YAML, anything else as JSON. Missing
/// fields take their defaults.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or malformed.
pub fn load_options(path: &Path) -> Result<GenerationOptions, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.display().to_string())
        } else {
            ConfigError::Io(e)
        }
    })?;

    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ExportFormat::from_extension)
        .unwrap_or(ExportFormat::Json);

    let options = match format {
        ExportFormat::Json => from_json(&content),
        ExportFormat::Yaml => from_yaml(&content),
    }
    .map_err(|source| ConfigError::Invalid {
        path: path.display().to_string(),
        source,
    })?;

    debug!(path = %path.display(), "Loaded generation options");
    Ok(options)
}

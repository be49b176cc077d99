//! Record importers.
//!
//! File-backed [`ExchangeSource`](trawl_application::ExchangeSource)
//! implementations: plain JSON record arrays and HAR 1.2 archives.

mod har;
mod records;

pub use har::{HarArchive, parse_har};
pub use records::{JsonRecordFile, parse_records};

use std::path::Path;

use thiserror::Error;
use trawl_application::SourceError;

/// Import error types
#[derive(Debug, Error)]
pub enum ImportError {
    /// File was not found at the specified path
    #[error("File not found: {0}")]
    FileNotFound(String),
    /// JSON parsing failed
    #[error("Invalid JSON in {source_name}: {message}")]
    InvalidJson {
        /// File the content came from
        source_name: String,
        /// Decoder message
        message: String,
    },
    /// Content parsed but is not the expected shape
    #[error("Invalid format in {source_name}: {message}")]
    InvalidFormat {
        /// File the content came from
        source_name: String,
        /// What was wrong
        message: String,
    },
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ImportError> for SourceError {
    fn from(error: ImportError) -> Self {
        match error {
            ImportError::FileNotFound(path) => Self::NotFound(path),
            ImportError::IoError(e) => Self::Io(e),
            ImportError::InvalidJson {
                source_name,
                message,
            }
            | ImportError::InvalidFormat {
                source_name,
                message,
            } => Self::Parse {
                source_name,
                message,
            },
        }
    }
}

/// Reads a whole file, mapping a missing file to [`ImportError::FileNotFound`].
pub(crate) fn read_file(path: &Path) -> Result<String, ImportError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ImportError::FileNotFound(path.display().to_string())
        } else {
            ImportError::IoError(e)
        }
    })
}

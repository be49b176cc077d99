//! Plain JSON record files.

use std::path::{Path, PathBuf};

use tracing::debug;
use trawl_application::{ExchangeSource, SourceError};
use trawl_domain::ExchangeRecord;

use super::{ImportError, read_file};

/// A JSON file holding an array of exchange records.
///
/// Field names follow the record model (`method`, `url`, `responseStatus`,
/// `requestHeaders`, ...). Missing ids are generated.
#[derive(Debug, Clone)]
pub struct JsonRecordFile {
    path: PathBuf,
}

impl JsonRecordFile {
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
}

impl ExchangeSource for JsonRecordFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<ExchangeRecord>, SourceError> {
        let content = read_file(&self.path)?;
        let records = parse_records(&content, &self.describe())?;
        debug!(path = %self.path.display(), records = records.len(), "Loaded record file");
        Ok(records)
    }
}

/// Parses a JSON array of records.
///
/// # Errors
///
/// Returns [`ImportError::InvalidJson`] for malformed JSON and
/// [`ImportError::InvalidFormat`] when the array elements are not records.
pub fn parse_records(content: &str, source_name: &str) -> Result<Vec<ExchangeRecord>, ImportError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| ImportError::InvalidJson {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    if !value.is_array() {
        return Err(ImportError::InvalidFormat {
            source_name: source_name.to_string(),
            message: "expected an array of records".to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| ImportError::InvalidFormat {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

//! Source ports
//!
//! Where captured records and existing documents come from.

use serde_json::Value;
use trawl_domain::ExchangeRecord;

/// Errors that can occur while loading from a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source does not exist.
    #[error("Source not found: {0}")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source content could not be decoded.
    #[error("Parse error in {source_name}: {message}")]
    Parse {
        /// Source description.
        source_name: String,
        /// Decoder message.
        message: String,
    },
}

/// A finite collection of captured exchanges.
pub trait ExchangeSource {
    /// Human-readable description used in logs and warnings.
    fn describe(&self) -> String;

    /// Loads every record of the source.
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or decoded.
    fn load(&self) -> Result<Vec<ExchangeRecord>, SourceError>;
}

/// An existing `OpenAPI` or Swagger document in raw form.
pub trait DocumentSource {
    /// Human-readable description used in logs and warnings.
    fn describe(&self) -> String;

    /// Loads the raw document tree.
    ///
    /// # Errors
    /// Returns [`SourceError::Parse`] if the content is neither JSON nor YAML,
    /// other variants if it cannot be read.
    fn load(&self) -> Result<Value, SourceError>;
}

impl<T: ExchangeSource + ?Sized> ExchangeSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn load(&self) -> Result<Vec<ExchangeRecord>, SourceError> {
        (**self).load()
    }
}

/// Records already held in memory.
impl ExchangeSource for Vec<ExchangeRecord> {
    fn describe(&self) -> String {
        format!("{} in-memory record(s)", self.len())
    }

    fn load(&self) -> Result<Vec<ExchangeRecord>, SourceError> {
        Ok(self.clone())
    }
}

/// A document already held in memory.
impl DocumentSource for Value {
    fn describe(&self) -> String {
        "in-memory document".to_string()
    }

    fn load(&self) -> Result<Value, SourceError> {
        Ok(self.clone())
    }
}

//! Application error types

use thiserror::Error;
use trawl_domain::{DomainError, HttpMethod};

use crate::ports::{SerializeError, SourceError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A record or document source failed to load.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// The document could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] SerializeError),

    /// An operation was requested for a partition with no records.
    ///
    /// Partitions are built from the records themselves, so this indicates
    /// a bug in the partitioning step.
    #[error("no records for {method} {path}")]
    EmptyPartition {
        /// Path template of the partition.
        path: String,
        /// Method of the partition.
        method: HttpMethod,
    },
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

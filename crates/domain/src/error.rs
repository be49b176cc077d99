//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method cannot be expressed as an `OpenAPI` operation.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A generation option holds an unusable value.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The export format name is not recognised.
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

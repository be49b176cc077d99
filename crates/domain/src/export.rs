//! Export format types.
//!
//! This module provides the output formats of a generated document, the
//! download filename convention and the warnings collected while building.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// Supported serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Pretty-printed JSON with 2-space indentation.
    Json,
    /// YAML.
    #[default]
    Yaml,
}

impl ExportFormat {
    /// Get all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Json, Self::Yaml]
    }

    /// Get the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Get the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Yaml => "application/x-yaml",
        }
    }

    /// Guesses the format from a file extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::from_extension(s).ok_or_else(|| DomainError::UnsupportedFormat(s.to_string()))
    }
}

/// Lower-cases `title` and replaces every run of characters outside
/// `[a-zA-Z0-9_-]` with a single `-`.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let mut sanitized = String::with_capacity(title.len());
    for ch in title.to_lowercase().chars() {
        let keep = ch.is_ascii_alphanumeric() || ch == '_' || ch == '-';
        let next = if keep { ch } else { '-' };
        if next == '-' && sanitized.ends_with('-') {
            continue;
        }
        sanitized.push(next);
    }
    sanitized
}

/// Returns the download filename `{sanitized-title}-openapi.{ext}`.
#[must_use]
pub fn export_filename(title: &str, format: ExportFormat) -> String {
    format!("{}-openapi.{}", sanitize_title(title), format.extension())
}

/// Result of an export operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    /// The serialized document.
    pub content: String,
    /// The format used.
    pub format: ExportFormat,
    /// Suggested download filename.
    pub filename: String,
    /// Number of records the document was built from.
    pub record_count: usize,
    /// Warnings generated during export.
    #[serde(default)]
    pub warnings: Vec<ExportWarning>,
}

impl ExportResult {
    /// Create a new export result.
    #[must_use]
    pub fn new(content: String, format: ExportFormat, filename: String, record_count: usize) -> Self {
        Self {
            content,
            format,
            filename,
            record_count,
            warnings: Vec::new(),
        }
    }

    /// Check if there were any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Warning generated during synthesis or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportWarning {
    /// Warning message.
    pub message: String,
    /// The record or document that generated the warning.
    pub source: Option<String>,
    /// Warning severity.
    pub severity: WarningSeverity,
}

impl ExportWarning {
    /// Create a new warning.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
            severity: WarningSeverity::Warning,
        }
    }

    /// Set the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set as info severity.
    #[must_use]
    pub const fn as_info(mut self) -> Self {
        self.severity = WarningSeverity::Info;
        self
    }
}

/// Warning severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational.
    Info,
    /// Warning (part of the input was left out).
    #[default]
    Warning,
}

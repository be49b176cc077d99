//! Generation options for document synthesis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// Server URL value meaning "derive servers from the captured hosts".
pub const AUTO_SERVER_URL: &str = "auto";

/// Shape of the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpecVersion {
    /// `OpenAPI` 3.0 (`components`, `requestBody`).
    #[default]
    OpenApi3,
    /// Swagger 2.0 (`definitions`, `body` parameter).
    Swagger2,
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenApi3 => write!(f, "openapi3"),
            Self::Swagger2 => write!(f, "swagger2"),
        }
    }
}

impl FromStr for SpecVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openapi3" | "openapi_3" | "3" | "3.0" => Ok(Self::OpenApi3),
            "swagger2" | "swagger_2" | "2" | "2.0" => Ok(Self::Swagger2),
            other => Err(DomainError::InvalidOption {
                name: "target".to_string(),
                reason: format!("unknown spec version `{other}`"),
            }),
        }
    }
}

/// Options controlling document synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Document version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Document description.
    #[serde(default)]
    pub description: Option<String>,
    /// Fixed server URL; `None` or `"auto"` derives servers from traffic.
    #[serde(default)]
    pub server_url: Option<String>,
    /// Whether parameters and payloads carry observed examples.
    #[serde(default = "default_true")]
    pub include_examples: bool,
    /// Whether numeric/UUID path segments become placeholders.
    #[serde(default = "default_true")]
    pub parameterize_urls: bool,
    /// Rendered document shape.
    #[serde(default)]
    pub target: SpecVersion,
}

fn default_title() -> String {
    "Captured API".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
            description: None,
            server_url: None,
            include_examples: true,
            parameterize_urls: true,
            target: SpecVersion::default(),
        }
    }
}

impl GenerationOptions {
    /// Creates options with the given title and version.
    #[must_use]
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a fixed server URL.
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Enables or disables examples.
    #[must_use]
    pub const fn with_examples(mut self, include: bool) -> Self {
        self.include_examples = include;
        self
    }

    /// Enables or disables path parameterization.
    #[must_use]
    pub const fn with_parameterized_urls(mut self, parameterize: bool) -> Self {
        self.parameterize_urls = parameterize;
        self
    }

    /// Sets the rendered document shape.
    #[must_use]
    pub const fn with_target(mut self, target: SpecVersion) -> Self {
        self.target = target;
        self
    }

    /// Returns the fixed server URL as given, ignoring the `"auto"` sentinel
    /// and blank values.
    #[must_use]
    pub fn fixed_server_url(&self) -> Option<&str> {
        self.server_url.as_deref().filter(|url| {
            let trimmed = url.trim();
            !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(AUTO_SERVER_URL)
        })
    }

    /// Names of the metadata fields that are blank.
    ///
    /// Blank values are still embedded as given; callers may report them.
    #[must_use]
    pub fn blank_metadata(&self) -> Vec<&'static str> {
        let mut blank = Vec::new();
        if self.title.trim().is_empty() {
            blank.push("title");
        }
        if self.version.trim().is_empty() {
            blank.push("version");
        }
        blank
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let options: GenerationOptions = serde_json::from_value(json!({ "title": "Shop" })).unwrap();
        assert_eq!(options.title, "Shop");
        assert_eq!(options.version, "1.0.0");
        assert!(options.include_examples);
        assert!(options.parameterize_urls);
        assert_eq!(options.target, SpecVersion::OpenApi3);
    }

    #[test]
    fn test_auto_server_url_is_ignored() {
        let options = GenerationOptions::default().with_server_url("auto");
        assert_eq!(options.fixed_server_url(), None);

        let options = GenerationOptions::default().with_server_url("https://api.x.com");
        assert_eq!(options.fixed_server_url(), Some("https://api.x.com"));
    }

    #[test]
    fn test_server_url_is_kept_verbatim() {
        let options = GenerationOptions::default().with_server_url("https://api.x.com/v1/ ");
        assert_eq!(options.fixed_server_url(), Some("https://api.x.com/v1/ "));

        let options = GenerationOptions::default().with_server_url("  ");
        assert_eq!(options.fixed_server_url(), None);

        let options = GenerationOptions::default().with_server_url(" AUTO ");
        assert_eq!(options.fixed_server_url(), None);
    }

    #[test]
    fn test_blank_metadata() {
        assert!(GenerationOptions::default().blank_metadata().is_empty());
        assert_eq!(GenerationOptions::new("  ", "").blank_metadata(), vec!["title", "version"]);
    }

    #[test]
    fn test_spec_version_from_str() {
        assert_eq!("swagger2".parse::<SpecVersion>().unwrap(), SpecVersion::Swagger2);
        assert_eq!("3.0".parse::<SpecVersion>().unwrap(), SpecVersion::OpenApi3);
        assert!("4".parse::<SpecVersion>().is_err());
    }
}

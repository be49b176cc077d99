//! Captured request/response exchanges.
//!
//! An [`ExchangeRecord`] is the unit of input handed over by the capture
//! pipeline. Records are never mutated once built.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::request::HttpMethod;
use crate::response::StatusCode;

/// Header map keyed by lower-cased header name.
pub type HeaderMap = BTreeMap<String, String>;

/// One captured request/response pair with its capture metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRecord {
    /// Opaque unique identifier.
    #[serde(default = "crate::generate_id")]
    pub id: String,
    /// Capture time in epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    /// HTTP method as captured (case preserved).
    pub method: String,
    /// Absolute request URL.
    pub url: String,
    /// Request headers.
    #[serde(default, deserialize_with = "lowercase_headers")]
    pub request_headers: HeaderMap,
    /// Response headers.
    #[serde(default, deserialize_with = "lowercase_headers")]
    pub response_headers: HeaderMap,
    /// Request body: a raw string or a JSON structure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    /// Response status code.
    pub response_status: StatusCode,
    /// Response body: a raw string or a JSON structure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Value>,
    /// Round-trip time in milliseconds.
    #[serde(default)]
    pub response_time_ms: u64,
    /// User-assigned grouping labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_tags: Vec<String>,
    /// User-assigned display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
}

fn lowercase_headers<'de, D>(deserializer: D) -> Result<HeaderMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, String>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect())
}

impl ExchangeRecord {
    /// Creates a record with a fresh id and no headers or bodies.
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>, status: u16) -> Self {
        Self {
            id: crate::generate_id(),
            timestamp: 0,
            method: method.into(),
            url: url.into(),
            request_headers: HeaderMap::new(),
            response_headers: HeaderMap::new(),
            request_body: None,
            response_status: StatusCode(status),
            response_body: None,
            response_time_ms: 0,
            custom_tags: Vec::new(),
            custom_title: None,
        }
    }

    /// Sets the capture timestamp (epoch milliseconds).
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Adds a request header. The name is lower-cased.
    #[must_use]
    pub fn with_request_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.request_headers
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Adds a response header. The name is lower-cased.
    #[must_use]
    pub fn with_response_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.response_headers
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_request_body(mut self, body: impl Into<Value>) -> Self {
        self.request_body = Some(body.into());
        self
    }

    /// Sets the response body.
    #[must_use]
    pub fn with_response_body(mut self, body: impl Into<Value>) -> Self {
        self.response_body = Some(body.into());
        self
    }

    /// Sets the user-assigned tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the user-assigned title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.custom_title = Some(title.into());
        self
    }

    /// Parses the record URL.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] when the URL is not absolute or
    /// cannot be parsed.
    pub fn parsed_url(&self) -> DomainResult<Url> {
        Url::parse(&self.url).map_err(|e| DomainError::InvalidUrl(format!("{}: {e}", self.url)))
    }

    /// Returns the method as an `OpenAPI`-compatible [`HttpMethod`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedMethod`] for extension methods.
    pub fn http_method(&self) -> DomainResult<HttpMethod> {
        self.method.parse()
    }

    /// Returns the request media type without parameters, lower-cased.
    #[must_use]
    pub fn request_content_type(&self) -> Option<String> {
        media_type(&self.request_headers)
    }

    /// Returns the response media type without parameters, lower-cased.
    #[must_use]
    pub fn response_content_type(&self) -> Option<String> {
        media_type(&self.response_headers)
    }

    /// Returns the capture time as a UTC date-time.
    #[must_use]
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

fn media_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get("content-type")
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().to_ascii_lowercase())
        .filter(|essence| !essence.is_empty())
}

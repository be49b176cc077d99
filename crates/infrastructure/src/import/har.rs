//! HTTP Archive (HAR) importer.
//!
//! Maps HAR 1.2 entries to exchange records. Only the fields the record
//! model carries are read; timings, cookies and cache data are ignored.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use trawl_application::{ExchangeSource, SourceError};
use trawl_domain::{ExchangeRecord, HeaderMap, StatusCode, generate_id};

use super::{ImportError, read_file};

/// A HAR 1.2 archive on disk.
#[derive(Debug, Clone)]
pub struct HarArchive {
    path: PathBuf,
}

impl HarArchive {
    /// Creates a source for the archive at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the archive.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExchangeSource for HarArchive {
    fn describe(&self) -> String {
        format!("HAR {}", self.path.display())
    }

    fn load(&self) -> Result<Vec<ExchangeRecord>, SourceError> {
        let content = read_file(&self.path)?;
        let records = parse_har(&content, &self.path.display().to_string())?;
        debug!(path = %self.path.display(), records = records.len(), "Loaded HAR archive");
        Ok(records)
    }
}

/// Parses HAR text into records, one per entry, in archive order.
///
/// # Errors
///
/// Returns [`ImportError::InvalidJson`] for malformed JSON and
/// [`ImportError::InvalidFormat`] when there is no `log.entries` array.
pub fn parse_har(content: &str, source_name: &str) -> Result<Vec<ExchangeRecord>, ImportError> {
    let value: Value = serde_json::from_str(content).map_err(|e| ImportError::InvalidJson {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;

    let har: Har = serde_json::from_value(value).map_err(|e| ImportError::InvalidFormat {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;

    Ok(har.log.entries.into_iter().map(HarEntry::into_record).collect())
}

#[derive(Debug, Deserialize)]
struct Har {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarEntry {
    #[serde(default)]
    started_date_time: String,
    #[serde(default)]
    time: f64,
    request: HarRequest,
    response: HarResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarRequest {
    method: String,
    url: String,
    #[serde(default)]
    headers: Vec<HarHeader>,
    #[serde(default)]
    post_data: Option<HarPostData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarResponse {
    status: u16,
    #[serde(default)]
    headers: Vec<HarHeader>,
    #[serde(default)]
    content: Option<HarContent>,
}

#[derive(Debug, Deserialize)]
struct HarHeader {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarPostData {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarContent {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

impl HarEntry {
    fn into_record(self) -> ExchangeRecord {
        let timestamp = DateTime::parse_from_rfc3339(&self.started_date_time)
            .map(|t| t.timestamp_millis())
            .unwrap_or_else(|_| {
                warn!(started = %self.started_date_time, url = %self.request.url, "Unreadable HAR timestamp");
                0
            });

        let response_body = self.response.content.and_then(|content| {
            if content.encoding.as_deref() == Some("base64") {
                debug!(url = %self.request.url, "Skipping base64 response body");
                return None;
            }
            non_empty(content.text)
        });

        ExchangeRecord {
            id: generate_id(),
            timestamp,
            method: self.request.method,
            url: self.request.url,
            request_headers: headers(self.request.headers),
            response_headers: headers(self.response.headers),
            request_body: self.request.post_data.and_then(|data| non_empty(data.text)),
            response_status: StatusCode(self.response.status),
            response_body,
            response_time_ms: millis(self.time),
            custom_tags: Vec::new(),
            custom_title: None,
        }
    }
}

/// Lower-cased headers without HTTP/2 pseudo-headers (`:authority`, ...).
fn headers(raw: Vec<HarHeader>) -> HeaderMap {
    raw.into_iter()
        .filter(|h| !h.name.starts_with(':'))
        .map(|h| (h.name.to_ascii_lowercase(), h.value))
        .collect()
}

fn non_empty(text: Option<String>) -> Option<Value> {
    text.filter(|t| !t.is_empty()).map(Value::String)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn millis(time: f64) -> u64 {
    if time.is_finite() && time > 0.0 {
        time.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ARCHIVE: &str = r#"{
        "log": {
            "version": "1.2",
            "creator": { "name": "browser", "version": "1" },
            "entries": [
                {
                    "startedDateTime": "2024-03-01T10:00:00.000Z",
                    "time": 41.6,
                    "request": {
                        "method": "POST",
                        "url": "https://api.x.com/users?notify=true",
                        "httpVersion": "HTTP/1.1",
                        "headers": [
                            { "name": ":authority", "value": "api.x.com" },
                            { "name": ":method", "value": "POST" },
                            { "name": "Content-Type", "value": "application/json" }
                        ],
                        "queryString": [{ "name": "notify", "value": "true" }],
                        "postData": { "mimeType": "application/json", "text": "{\"name\":\"Ann\"}" }
                    },
                    "response": {
                        "status": 201,
                        "statusText": "Created",
                        "headers": [
                            { "name": ":status", "value": "201" },
                            { "name": "Location", "value": "/users/9" }
                        ],
                        "content": { "size": 8, "mimeType": "application/json", "text": "{\"id\":9}" }
                    },
                    "timings": { "send": 0, "wait": 41, "receive": 0 }
                },
                {
                    "startedDateTime": "not a date",
                    "time": -1,
                    "request": { "method": "GET", "url": "https://api.x.com/logo.png", "headers": [] },
                    "response": {
                        "status": 200,
                        "headers": [],
                        "content": { "size": 3, "mimeType": "image/png", "text": "AAAA", "encoding": "base64" }
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn test_entries_map_to_records() {
        let records = parse_har(ARCHIVE, "inline").unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.method, "POST");
        assert_eq!(first.url, "https://api.x.com/users?notify=true");
        assert_eq!(first.timestamp, 1_709_287_200_000);
        assert_eq!(first.response_time_ms, 42);
        assert_eq!(first.request_headers["content-type"], "application/json");
        assert_eq!(first.response_headers["location"], "/users/9");
        assert_eq!(first.request_headers.len(), 1);
        assert_eq!(first.response_headers.len(), 1);
        assert!(first.request_headers.keys().all(|name| !name.starts_with(':')));
        assert_eq!(
            first.request_body,
            Some(Value::String("{\"name\":\"Ann\"}".to_string()))
        );
        assert_eq!(first.response_body, Some(Value::String("{\"id\":9}".to_string())));
        assert_eq!(first.response_status, StatusCode(201));
    }

    #[test]
    fn test_unreadable_fields_fall_back() {
        let records = parse_har(ARCHIVE, "inline").unwrap();
        let second = &records[1];

        assert_eq!(second.timestamp, 0);
        assert_eq!(second.response_time_ms, 0);
        assert_eq!(second.request_body, None);
        assert_eq!(second.response_body, None);
    }

    #[test]
    fn test_missing_log_is_invalid_format() {
        let error = parse_har(r#"{"entries": []}"#, "inline").unwrap_err();
        assert!(matches!(error, ImportError::InvalidFormat { .. }));
    }

    #[test]
    fn test_malformed_json_is_invalid_json() {
        let error = parse_har("{", "inline").unwrap_err();
        assert!(matches!(error, ImportError::InvalidJson { .. }));
    }
}

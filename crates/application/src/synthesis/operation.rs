//! Synthesis of one `OpenAPI` operation from the records of a partition.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Value, json};
use trawl_domain::{
    ExchangeRecord, HttpMethod, MediaType, Operation, ReferenceOr, Response, Responses,
    StatusCode, UNGROUPED_TAG,
};

use super::inference::{field_count, normalize_body};
use super::parameters::{DEFAULT_CONTENT_TYPE, ParameterExtractor, media_types};
use super::path_template::resource_name;
use crate::error::{ApplicationError, ApplicationResult};

#[allow(clippy::expect_used)]
static DOMAIN_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex"));

#[allow(clippy::expect_used)]
static IPV4_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}(:\d+)?$").expect("valid regex")
});

/// Response headers documented on every response besides `x-*` ones.
pub const DOCUMENTED_RESPONSE_HEADERS: &[&str] = &[
    "content-type",
    "cache-control",
    "etag",
    "last-modified",
    "location",
    "set-cookie",
    "x-rate-limit-remaining",
    "x-total-count",
    "x-pagination-page",
];

/// Returns true if a response header belongs in the generated documentation.
#[must_use]
pub fn is_documented_header(name: &str) -> bool {
    name.starts_with("x-") || DOCUMENTED_RESPONSE_HEADERS.contains(&name)
}

/// Builds operations from partitions of records.
#[derive(Debug, Clone, Copy)]
pub struct OperationSynthesizer {
    parameters: ParameterExtractor,
    include_examples: bool,
}

impl OperationSynthesizer {
    /// Creates a synthesizer.
    #[must_use]
    pub const fn new(include_examples: bool, parameterize_urls: bool) -> Self {
        Self {
            parameters: ParameterExtractor::new(include_examples, parameterize_urls),
            include_examples,
        }
    }

    /// Synthesizes the operation for `method` on `path` from `records`.
    ///
    /// The operation id is left unset; ids are assigned per document.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::EmptyPartition`] when `records` is empty.
    pub fn synthesize(
        &self,
        path: &str,
        method: HttpMethod,
        records: &[&ExchangeRecord],
    ) -> ApplicationResult<Operation> {
        let representative =
            representative(records).ok_or_else(|| ApplicationError::EmptyPartition {
                path: path.to_string(),
                method,
            })?;

        Ok(Operation {
            tags: operation_tags(representative),
            summary: Some(summary(representative, path, method)),
            description: Some(description(records)),
            operation_id: None,
            parameters: self
                .parameters
                .extract(records)
                .into_iter()
                .map(ReferenceOr::Item)
                .collect(),
            request_body: self.parameters.request_body(records),
            responses: self.responses(records),
            extensions: IndexMap::new(),
        })
    }

    fn responses(&self, records: &[&ExchangeRecord]) -> Responses {
        let mut by_status: BTreeMap<StatusCode, Vec<&ExchangeRecord>> = BTreeMap::new();
        for record in records.iter().copied() {
            by_status.entry(record.response_status).or_default().push(record);
        }

        by_status
            .into_iter()
            .map(|(status, group)| {
                let response = Response {
                    description: status.description(),
                    headers: self.response_headers(&group),
                    content: self.response_content(&group),
                    extensions: IndexMap::new(),
                };
                (status.to_string(), ReferenceOr::Item(response))
            })
            .collect()
    }

    fn response_content(&self, group: &[&ExchangeRecord]) -> IndexMap<String, MediaType> {
        let mut bodies: IndexMap<String, Vec<Value>> = IndexMap::new();
        for record in group {
            let content_type = record
                .response_content_type()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            if let Some(body) = normalize_body(record.response_body.as_ref(), Some(&content_type)) {
                bodies.entry(content_type).or_default().push(body);
            }
        }
        media_types(bodies, self.include_examples)
    }

    fn response_headers(&self, group: &[&ExchangeRecord]) -> IndexMap<String, Value> {
        let mut headers: IndexMap<String, Value> = IndexMap::new();
        for record in group {
            for (name, value) in &record.response_headers {
                if !is_documented_header(name) || headers.contains_key(name) {
                    continue;
                }
                let mut header = json!({
                    "description": format!("{name} response header"),
                    "schema": { "type": "string" },
                });
                if self.include_examples {
                    header["example"] = Value::String(value.clone());
                }
                headers.insert(name.clone(), header);
            }
        }
        headers
    }
}

/// Picks the record that drives the summary and tags of an operation.
///
/// The most recent successful record wins, the first one on equal
/// timestamps. Without any success, the record with the most query
/// parameters plus body fields wins.
#[must_use]
pub fn representative<'a>(records: &[&'a ExchangeRecord]) -> Option<&'a ExchangeRecord> {
    let mut latest_success: Option<&ExchangeRecord> = None;
    for record in records.iter().copied() {
        if !record.response_status.is_success() {
            continue;
        }
        if latest_success.is_none_or(|best| record.timestamp > best.timestamp) {
            latest_success = Some(record);
        }
    }
    if latest_success.is_some() {
        return latest_success;
    }

    let mut richest: Option<(&ExchangeRecord, usize)> = None;
    for record in records.iter().copied() {
        let score = observed_parameter_count(record);
        if richest.is_none_or(|(_, best)| score > best) {
            richest = Some((record, score));
        }
    }
    richest.map(|(record, _)| record)
}

fn observed_parameter_count(record: &ExchangeRecord) -> usize {
    let query = record
        .parsed_url()
        .map_or(0, |url| url.query_pairs().count());
    let content_type = record.request_content_type();
    let body = normalize_body(record.request_body.as_ref(), content_type.as_deref())
        .map_or(0, |body| field_count(&body));
    query + body
}

/// Summary from the custom title, else action word plus resource name.
#[must_use]
pub fn summary(representative: &ExchangeRecord, path: &str, method: HttpMethod) -> String {
    if let Some(title) = representative
        .custom_title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
    {
        return title.to_string();
    }
    resource_name(path).map_or_else(
        || format!("{} root", method.as_str()),
        |resource| format!("{} {resource}", method.action_word()),
    )
}

/// Sample count, observation window and distinct status codes.
#[must_use]
pub fn description(records: &[&ExchangeRecord]) -> String {
    let first = records.iter().min_by_key(|r| r.timestamp);
    let last = records.iter().max_by_key(|r| r.timestamp);
    let statuses: BTreeSet<StatusCode> = records.iter().map(|r| r.response_status).collect();
    let statuses: Vec<String> = statuses.iter().map(ToString::to_string).collect();

    format!(
        "Observed {} time(s) between {} and {}. Status codes: {}.",
        records.len(),
        first.map_or_else(String::new, |r| format_capture(r)),
        last.map_or_else(String::new, |r| format_capture(r)),
        statuses.join(", ")
    )
}

fn format_capture(record: &ExchangeRecord) -> String {
    record
        .captured_at()
        .map_or_else(|| record.timestamp.to_string(), |at| at.to_rfc3339())
}

/// User tags of the representative record without host-like entries.
///
/// Falls back to the ungrouped tag when nothing usable remains or the
/// record URL cannot be parsed.
#[must_use]
pub fn operation_tags(representative: &ExchangeRecord) -> Vec<String> {
    let Ok(url) = representative.parsed_url() else {
        return vec![UNGROUPED_TAG.to_string()];
    };
    let host = url.host_str().unwrap_or_default();

    let mut tags: Vec<String> = Vec::new();
    for tag in representative.custom_tags.iter().map(|t| t.trim()) {
        let host_like =
            tag.eq_ignore_ascii_case(host) || DOMAIN_LIKE.is_match(tag) || IPV4_LIKE.is_match(tag);
        if tag.is_empty() || host_like || tags.iter().any(|t| t == tag) {
            continue;
        }
        tags.push(tag.to_string());
    }

    if tags.is_empty() {
        tags.push(UNGROUPED_TAG.to_string());
    }
    tags
}

/// Base operation id: lower-case method plus the CamelCase literal segments.
#[must_use]
pub fn operation_id_base(method: HttpMethod, path: &str) -> String {
    let mut id = method.path_item_key().to_string();
    let literal = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !segment.starts_with('{'));
    for segment in literal {
        for word in segment.split(|c: char| !c.is_ascii_alphanumeric()) {
            let mut chars = word.chars();
            if let Some(head) = chars.next() {
                id.push(head.to_ascii_uppercase());
                id.push_str(chars.as_str());
            }
        }
    }
    if id.len() == method.path_item_key().len() {
        id.push_str("Root");
    }
    id
}

//! Document synthesis from a full set of captured records.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use tracing::{debug, info, warn};
use trawl_domain::{
    ExchangeRecord, ExportWarning, GenerationOptions, HttpMethod, Info, OpenApiDocument, PathItem,
    Server, Tag,
};

use super::operation::{OperationSynthesizer, operation_id_base};
use super::path_template::PathTemplate;
use crate::error::ApplicationResult;

/// Records grouped by path template, then by method, in first-seen order.
type Partitions<'a> = IndexMap<String, IndexMap<HttpMethod, Vec<&'a ExchangeRecord>>>;

/// Outcome of a build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// The synthesized document.
    pub document: OpenApiDocument,
    /// Data-quality issues found along the way.
    pub warnings: Vec<ExportWarning>,
    /// Number of records that ended up in `paths`.
    pub record_count: usize,
}

impl BuildReport {
    /// Returns true if no record made it into the document.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// Builds a complete `OpenAPI` document from captured records.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    options: GenerationOptions,
    synthesizer: OperationSynthesizer,
}

impl DocumentBuilder {
    /// Creates a builder for the given options.
    #[must_use]
    pub fn new(options: GenerationOptions) -> Self {
        let synthesizer =
            OperationSynthesizer::new(options.include_examples, options.parameterize_urls);
        Self {
            options,
            synthesizer,
        }
    }

    /// Returns the options this builder was created with.
    #[must_use]
    pub const fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Synthesizes the document for `records`.
    ///
    /// Malformed URLs, unsupported methods and blank metadata never fail the
    /// build; they are reported as warnings. No records yields a document
    /// with empty paths.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::EmptyPartition`](crate::ApplicationError)
    /// if partitioning produced an empty group.
    pub fn build(&self, records: &[ExchangeRecord]) -> ApplicationResult<BuildReport> {
        let mut warnings: Vec<ExportWarning> = self
            .options
            .blank_metadata()
            .into_iter()
            .map(|field| {
                warn!(field, "Blank document metadata embedded as given");
                ExportWarning::new(format!("Blank {field} embedded as given")).as_info()
            })
            .collect();
        let partitions = self.partition(records, &mut warnings);

        let mut info_block = Info::new(&self.options.title, &self.options.version);
        info_block.description = self.options.description.clone();
        let mut document = OpenApiDocument::new(info_block);

        let mut used_ids: HashSet<String> = HashSet::new();
        let mut record_count = 0_usize;
        for (path, methods) in &partitions {
            let mut item = PathItem::default();
            for (method, group) in methods {
                debug!(path = %path, method = %method, records = group.len(), "Synthesizing operation");
                let mut operation = self.synthesizer.synthesize(path, *method, group)?;
                let base = operation_id_base(*method, path);
                operation.operation_id = Some(unique_id(base, &mut used_ids));
                item.set_operation(*method, operation);
                record_count += group.len();
            }
            document.paths.insert(path.clone(), item);
        }

        document.servers = self.servers(records);
        document.tags = declared_tags(&document);

        info!(
            paths = document.paths.len(),
            records = record_count,
            warnings = warnings.len(),
            "Built OpenAPI document"
        );

        Ok(BuildReport {
            document,
            warnings,
            record_count,
        })
    }

    fn partition<'a>(
        &self,
        records: &'a [ExchangeRecord],
        warnings: &mut Vec<ExportWarning>,
    ) -> Partitions<'a> {
        let mut partitions: Partitions<'a> = IndexMap::new();

        for record in records {
            let source = format!("{} {}", record.method, record.url);
            let method = match record.http_method() {
                Ok(method) => method,
                Err(error) => {
                    warn!(record = %record.id, %error, "Skipping record");
                    warnings.push(
                        ExportWarning::new(format!("Skipped record: {error}")).with_source(source),
                    );
                    continue;
                }
            };

            if let Err(error) = record.parsed_url() {
                warn!(record = %record.id, %error, "Using raw URL as path");
                warnings.push(
                    ExportWarning::new(format!("Malformed URL used verbatim: {error}"))
                        .with_source(source)
                        .as_info(),
                );
            }

            let template = PathTemplate::for_url(&record.url, self.options.parameterize_urls);
            partitions
                .entry(template.template)
                .or_default()
                .entry(method)
                .or_default()
                .push(record);
        }

        partitions
    }

    fn servers(&self, records: &[ExchangeRecord]) -> Vec<Server> {
        if let Some(url) = self.options.fixed_server_url() {
            return vec![Server::new(url)];
        }

        let mut origins: Vec<String> = Vec::new();
        for record in records {
            let Ok(url) = record.parsed_url() else {
                continue;
            };
            let origin = url.origin();
            if !origin.is_tuple() {
                continue;
            }
            let origin = origin.ascii_serialization();
            if !origins.contains(&origin) {
                origins.push(origin);
            }
        }
        origins.into_iter().map(Server::new).collect()
    }
}

fn unique_id(base: String, used: &mut HashSet<String>) -> String {
    let mut candidate = base.clone();
    let mut suffix = 2_usize;
    while used.contains(&candidate) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// One top-level tag per operation tag, describing what it groups.
fn declared_tags(document: &OpenApiDocument) -> Vec<Tag> {
    let mut usage: IndexMap<&str, (usize, BTreeSet<HttpMethod>)> = IndexMap::new();
    for (_, method, operation) in document.operations() {
        for tag in &operation.tags {
            let entry = usage.entry(tag.as_str()).or_default();
            entry.0 += 1;
            entry.1.insert(method);
        }
    }

    usage
        .into_iter()
        .map(|(name, (count, methods))| {
            let methods: Vec<&str> = methods.iter().map(|m| m.as_str()).collect();
            Tag::new(name, format!("{count} endpoint(s) ({})", methods.join(", ")))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use trawl_domain::{ReferenceOr, UNGROUPED_TAG, WarningSeverity};

    fn build(records: &[ExchangeRecord]) -> BuildReport {
        DocumentBuilder::new(GenerationOptions::default())
            .build(records)
            .unwrap()
    }

    #[test]
    fn test_user_lookup_scenario() {
        let records = vec![
            ExchangeRecord::new("GET", "https://api.x.com/users/42?active=true", 200)
                .with_response_body(json!({ "id": 42, "name": "Ann" })),
            ExchangeRecord::new("GET", "https://api.x.com/users/7?active=false", 200)
                .with_response_body(json!({ "id": 7, "name": null })),
        ];
        let report = build(&records);
        let document = &report.document;

        assert_eq!(document.paths.keys().collect::<Vec<_>>(), vec!["/users/{id}"]);
        let get = document.operation("/users/{id}", HttpMethod::Get).unwrap();

        let query: Vec<_> = get
            .parameters
            .iter()
            .filter_map(ReferenceOr::as_item)
            .filter(|p| p.location == trawl_domain::ParameterLocation::Query)
            .collect();
        assert_eq!(query.len(), 1);
        assert_eq!(query[0].name, "active");
        assert_eq!(query[0].schema, Some(json!({ "type": "boolean" })));
        assert_eq!(query[0].example, Some(json!(true)));

        let ok = get.responses["200"].as_item().unwrap();
        assert_eq!(
            ok.content["application/json"].schema,
            Some(json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "name": { "type": "string", "nullable": true }
                },
                "required": ["id"]
            }))
        );
        assert_eq!(report.record_count, 2);
    }

    #[test]
    fn test_empty_input_yields_valid_empty_document() {
        let report = build(&[]);
        assert!(report.is_empty());
        assert!(report.document.paths.is_empty());
        assert!(report.document.servers.is_empty());
        assert!(report.document.components.is_empty());
        assert_eq!(report.document.info.title, "Captured API");
    }

    #[test]
    fn test_servers_from_distinct_origins() {
        let records = vec![
            ExchangeRecord::new("GET", "https://api.x.com/a", 200),
            ExchangeRecord::new("GET", "http://localhost:8080/b", 200),
            ExchangeRecord::new("GET", "https://api.x.com/c", 200),
            ExchangeRecord::new("GET", "garbage", 200),
        ];
        let urls: Vec<String> = build(&records)
            .document
            .servers
            .into_iter()
            .map(|s| s.url)
            .collect();
        assert_eq!(urls, vec!["https://api.x.com", "http://localhost:8080"]);
    }

    #[test]
    fn test_fixed_server_url_wins() {
        let options = GenerationOptions::default().with_server_url("https://prod.x.com/v1");
        let report = DocumentBuilder::new(options)
            .build(&[ExchangeRecord::new("GET", "https://staging.x.com/a", 200)])
            .unwrap();
        assert_eq!(report.document.servers, vec![Server::new("https://prod.x.com/v1")]);
    }

    #[test]
    fn test_top_level_tags_cover_operation_tags() {
        let records = vec![
            ExchangeRecord::new("GET", "https://a.io/users", 200).with_tags(["users"]),
            ExchangeRecord::new("POST", "https://a.io/users", 201).with_tags(["users"]),
            ExchangeRecord::new("GET", "https://a.io/health", 200),
        ];
        let document = build(&records).document;

        assert!(document.undeclared_tags().is_empty());
        assert_eq!(
            document.tags,
            vec![
                Tag::new("users", "2 endpoint(s) (GET, POST)"),
                Tag::new(UNGROUPED_TAG, "1 endpoint(s) (GET)"),
            ]
        );
    }

    #[test]
    fn test_operation_ids_are_unique() {
        let records = vec![
            ExchangeRecord::new("GET", "https://a.io/users/1", 200),
            ExchangeRecord::new("GET", "https://a.io/users", 200),
            ExchangeRecord::new("GET", "https://a.io/users/1/2", 200),
        ];
        let document = build(&records).document;
        let ids: Vec<String> = document
            .operations()
            .filter_map(|(_, _, op)| op.operation_id.clone())
            .collect();
        assert_eq!(ids, vec!["getUsers", "getUsers_2", "getUsers_3"]);
    }

    #[test]
    fn test_unsupported_method_is_skipped_with_warning() {
        let records = vec![
            ExchangeRecord::new("PROPFIND", "https://a.io/dav", 207),
            ExchangeRecord::new("get", "https://a.io/dav", 200),
        ];
        let report = build(&records);

        assert_eq!(report.record_count, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].severity, WarningSeverity::Warning);
        assert_eq!(report.warnings[0].source.as_deref(), Some("PROPFIND https://a.io/dav"));
        assert!(report.document.operation("/dav", HttpMethod::Get).is_some());
    }

    #[test]
    fn test_malformed_url_is_kept_with_info_warning() {
        let records = vec![
            ExchangeRecord::new("GET", "/relative/1", 200).with_response_body(json!({ "ok": true })),
        ];
        let report = build(&records);

        assert!(report.document.operation("/relative/1", HttpMethod::Get).is_some());
        assert_eq!(report.warnings[0].severity, WarningSeverity::Info);
    }

    #[test]
    fn test_raw_paths_keep_ids() {
        let options = GenerationOptions::default().with_parameterized_urls(false);
        let report = DocumentBuilder::new(options)
            .build(&[
                ExchangeRecord::new("GET", "https://a.io/users/1", 200),
                ExchangeRecord::new("GET", "https://a.io/users/2", 200),
            ])
            .unwrap();
        let paths: Vec<&String> = report.document.paths.keys().collect();
        assert_eq!(paths, vec!["/users/1", "/users/2"]);
    }

    #[test]
    fn test_blank_title_is_embedded_with_info_warning() {
        let options = GenerationOptions::new("", "1.0.0");
        let report = DocumentBuilder::new(options)
            .build(&[ExchangeRecord::new("GET", "https://a.io/x", 200)])
            .unwrap();

        assert_eq!(report.document.info.title, "");
        assert!(report.document.operation("/x", HttpMethod::Get).is_some());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].severity, WarningSeverity::Info);
        assert!(report.warnings[0].message.contains("title"));
    }
}

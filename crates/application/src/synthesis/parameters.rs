//! Parameter and request body extraction for one `(path, method)` partition.

use indexmap::IndexMap;
use serde_json::Value;
use trawl_domain::{
    ExchangeRecord, MediaType, Parameter, ParameterLocation, ReferenceOr, RequestBody, Schema,
};

use super::inference::{infer_literal, infer_schema, normalize_body};
use super::path_template::{PathTemplate, SegmentKind};
use super::schema_merge::merge_schemas;

/// Media type assumed when a record has no `content-type` header.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Derives the parameter list and request body of a partition.
#[derive(Debug, Clone, Copy)]
pub struct ParameterExtractor {
    include_examples: bool,
    parameterize_urls: bool,
}

impl ParameterExtractor {
    /// Creates an extractor.
    #[must_use]
    pub const fn new(include_examples: bool, parameterize_urls: bool) -> Self {
        Self {
            include_examples,
            parameterize_urls,
        }
    }

    /// Collects path, query and header parameters across `records`.
    ///
    /// Parameters are deduplicated by `(location, name)`; the first record
    /// that mentions a parameter supplies its schema and example. Records
    /// with an unparseable URL contribute nothing.
    #[must_use]
    pub fn extract(&self, records: &[&ExchangeRecord]) -> Vec<Parameter> {
        let mut parameters: IndexMap<(ParameterLocation, String), Parameter> = IndexMap::new();

        for record in records {
            let Ok(url) = record.parsed_url() else {
                continue;
            };

            if self.parameterize_urls {
                for placeholder in PathTemplate::from_path(url.path()).parameters {
                    let description = match placeholder.kind {
                        SegmentKind::Id => "Numeric identifier",
                        SegmentKind::Uuid => "UUID identifier",
                    };
                    self.insert(
                        &mut parameters,
                        placeholder.name,
                        ParameterLocation::Path,
                        description,
                        &placeholder.kind.schema(),
                        placeholder.example,
                    );
                }
            }

            for (name, raw) in url.query_pairs() {
                let (schema, example) = infer_literal(&raw);
                self.insert(
                    &mut parameters,
                    name.into_owned(),
                    ParameterLocation::Query,
                    "Query parameter",
                    &schema,
                    example,
                );
            }

            for (name, value) in &record.request_headers {
                self.insert(
                    &mut parameters,
                    name.clone(),
                    ParameterLocation::Header,
                    "Request header",
                    &Schema::string(),
                    Value::String(value.clone()),
                );
            }
        }

        parameters.into_values().collect()
    }

    fn insert(
        &self,
        parameters: &mut IndexMap<(ParameterLocation, String), Parameter>,
        name: String,
        location: ParameterLocation,
        description: &str,
        schema: &Schema,
        example: Value,
    ) {
        let key = (location, name);
        if parameters.contains_key(&key) {
            return;
        }
        let parameter = Parameter {
            name: key.1.clone(),
            location,
            description: Some(description.to_string()),
            required: location == ParameterLocation::Path,
            schema: Some(schema.to_value()),
            example: self.include_examples.then_some(example),
            extensions: IndexMap::new(),
        };
        parameters.insert(key, parameter);
    }

    /// Builds the request body from every record that sent one.
    ///
    /// Bodies are grouped by request media type, and each group gets the
    /// merged schema of its samples. The body is required only when every
    /// record in the partition sent one.
    #[must_use]
    pub fn request_body(&self, records: &[&ExchangeRecord]) -> Option<ReferenceOr<RequestBody>> {
        let mut groups: IndexMap<String, Vec<Value>> = IndexMap::new();
        let mut with_body = 0_usize;

        for record in records {
            let content_type = record
                .request_content_type()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            if let Some(body) = normalize_body(record.request_body.as_ref(), Some(&content_type)) {
                with_body += 1;
                groups.entry(content_type).or_default().push(body);
            }
        }

        if groups.is_empty() {
            return None;
        }

        Some(ReferenceOr::Item(RequestBody {
            description: None,
            content: media_types(groups, self.include_examples),
            required: with_body == records.len(),
            extensions: IndexMap::new(),
        }))
    }
}

/// Turns grouped sample bodies into media type entries.
pub(crate) fn media_types(
    groups: IndexMap<String, Vec<Value>>,
    include_examples: bool,
) -> IndexMap<String, MediaType> {
    groups
        .into_iter()
        .map(|(content_type, bodies)| {
            let schemas: Vec<Schema> = bodies.iter().map(infer_schema).collect();
            let media = MediaType {
                schema: merge_schemas(&schemas).map(|schema| schema.to_value()),
                example: if include_examples {
                    bodies.into_iter().next()
                } else {
                    None
                },
                extensions: IndexMap::new(),
            };
            (content_type, media)
        })
        .collect()
}

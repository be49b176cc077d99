//! Merging two `OpenAPI` documents into one.
//!
//! Merges are left-biased: on any conflict the first document wins. Inputs
//! are only read; the result is always a fresh document.

use serde_json::Value;
use tracing::{debug, info, warn};
use trawl_domain::{
    Components, Extensions, ExportWarning, HttpMethod, Info, OpenApiDocument, Operation,
    Parameter, PathItem, ReferenceOr,
};

use crate::swagger::{self, SWAGGER_ONLY_FIELDS};

/// Title of the document synthesized when neither input is usable.
pub const MERGED_TITLE: &str = "Merged API";

/// Version of the document synthesized when neither input is usable.
pub const MERGED_VERSION: &str = "1.0.0";

/// Result of merging two raw documents.
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// The merged document.
    pub document: OpenApiDocument,
    /// Inputs that were dropped as unusable.
    pub warnings: Vec<ExportWarning>,
}

/// Interprets a raw document as `OpenAPI` 3.
///
/// 3.x documents are read as they are, Swagger 2.0 documents are upgraded,
/// anything else is unusable and yields `None`.
#[must_use]
pub fn normalize(raw: &Value) -> Option<OpenApiDocument> {
    if swagger::is_openapi3(raw) {
        return serde_json::from_value(raw.clone())
            .map_err(|error| debug!(%error, "OpenAPI 3 document does not fit the model"))
            .ok();
    }
    swagger::upgrade(raw)
}

/// Merges two raw documents, dropping whichever is unusable.
#[must_use]
pub fn merge_raw(a: &Value, b: &Value) -> MergeReport {
    let mut warnings: Vec<ExportWarning> = Vec::new();
    let mut usable = |raw: &Value, label: &str| {
        let document = normalize(raw);
        if document.is_none() {
            warn!(input = label, "Ignoring document that is neither OpenAPI 3.x nor Swagger 2.0");
            warnings.push(
                ExportWarning::new("Document is neither OpenAPI 3.x nor Swagger 2.0")
                    .with_source(label),
            );
        }
        document
    };
    let a = usable(a, "first");
    let b = usable(b, "second");

    MergeReport {
        document: merge(a.as_ref(), b.as_ref()),
        warnings,
    }
}

/// Merges two documents; absent inputs are skipped.
///
/// With both inputs absent the result is an empty document titled
/// [`MERGED_TITLE`].
#[must_use]
pub fn merge(a: Option<&OpenApiDocument>, b: Option<&OpenApiDocument>) -> OpenApiDocument {
    let mut merged = match (a, b) {
        (Some(a), Some(b)) => merge_documents(a, b),
        (Some(single), None) | (None, Some(single)) => single.clone(),
        (None, None) => OpenApiDocument::new(Info::new(MERGED_TITLE, MERGED_VERSION)),
    };
    for key in SWAGGER_ONLY_FIELDS {
        merged.extensions.shift_remove(*key);
    }

    info!(
        paths = merged.paths.len(),
        operations = merged.operations().count(),
        "Merged OpenAPI documents"
    );
    merged
}

fn merge_documents(a: &OpenApiDocument, b: &OpenApiDocument) -> OpenApiDocument {
    let mut servers = a.servers.clone();
    for server in &b.servers {
        if !servers.iter().any(|s| s.url == server.url) {
            servers.push(server.clone());
        }
    }

    let mut tags = a.tags.clone();
    for tag in &b.tags {
        if !tags.iter().any(|t| t.name == tag.name) {
            tags.push(tag.clone());
        }
    }

    let mut paths = a.paths.clone();
    for (path, theirs) in &b.paths {
        let merged = match paths.get(path) {
            Some(ours) => merge_path_items(ours, theirs),
            None => theirs.clone(),
        };
        paths.insert(path.clone(), merged);
    }
    paths.extensions = merge_extensions(&a.paths.extensions, &b.paths.extensions);

    OpenApiDocument {
        openapi: a.openapi.clone(),
        info: merge_info(&a.info, &b.info),
        servers,
        tags,
        paths,
        components: merge_components(&a.components, &b.components),
        extensions: merge_extensions(&a.extensions, &b.extensions),
    }
}

fn merge_info(a: &Info, b: &Info) -> Info {
    Info {
        title: prefer_non_empty(&a.title, &b.title),
        version: prefer_non_empty(&a.version, &b.version),
        description: prefer_some(a.description.as_ref(), b.description.as_ref()),
        extensions: merge_extensions(&a.extensions, &b.extensions),
    }
}

fn merge_path_items(a: &PathItem, b: &PathItem) -> PathItem {
    let mut merged = PathItem {
        summary: prefer_some(a.summary.as_ref(), b.summary.as_ref()),
        description: prefer_some(a.description.as_ref(), b.description.as_ref()),
        parameters: merge_parameters(&a.parameters, &b.parameters),
        extensions: merge_extensions(&a.extensions, &b.extensions),
        ..PathItem::default()
    };
    for method in HttpMethod::all().iter().copied() {
        let operation = match (a.operation(method), b.operation(method)) {
            (Some(ours), Some(theirs)) => Some(merge_operations(ours, theirs)),
            (Some(single), None) | (None, Some(single)) => Some(single.clone()),
            (None, None) => None,
        };
        *merged.slot_mut(method) = operation;
    }
    merged
}

fn merge_operations(a: &Operation, b: &Operation) -> Operation {
    let mut tags = a.tags.clone();
    for tag in &b.tags {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }

    let mut responses = a.responses.clone();
    for (code, response) in &b.responses {
        responses
            .entry(code.clone())
            .or_insert_with(|| response.clone());
    }
    responses.extensions = merge_extensions(&a.responses.extensions, &b.responses.extensions);

    Operation {
        tags,
        summary: prefer_some(a.summary.as_ref(), b.summary.as_ref()),
        description: prefer_some(a.description.as_ref(), b.description.as_ref()),
        operation_id: prefer_some(a.operation_id.as_ref(), b.operation_id.as_ref()),
        parameters: merge_parameters(&a.parameters, &b.parameters),
        request_body: a.request_body.clone().or_else(|| b.request_body.clone()),
        responses,
        extensions: merge_extensions(&a.extensions, &b.extensions),
    }
}

/// Union keyed by `(location, name)` for inline parameters and by target
/// for references.
fn merge_parameters(
    a: &[ReferenceOr<Parameter>],
    b: &[ReferenceOr<Parameter>],
) -> Vec<ReferenceOr<Parameter>> {
    let mut merged: Vec<ReferenceOr<Parameter>> = a.to_vec();
    for candidate in b {
        let duplicate = merged.iter().any(|existing| match (existing, candidate) {
            (ReferenceOr::Item(ours), ReferenceOr::Item(theirs)) => ours.key() == theirs.key(),
            (
                ReferenceOr::Reference { reference: ours },
                ReferenceOr::Reference { reference: theirs },
            ) => ours == theirs,
            _ => false,
        });
        if !duplicate {
            merged.push(candidate.clone());
        }
    }
    merged
}

fn merge_components(a: &Components, b: &Components) -> Components {
    let mut merged = a.clone();
    for (ours, theirs) in merged.categories_mut().into_iter().zip(b.categories()) {
        for (name, component) in theirs {
            ours.entry(name.clone()).or_insert_with(|| component.clone());
        }
    }
    merged.extensions = merge_extensions(&a.extensions, &b.extensions);
    merged
}

fn merge_extensions(a: &Extensions, b: &Extensions) -> Extensions {
    let mut merged: Extensions = a.clone();
    for (key, value) in b {
        merged.entry(key.clone()).or_insert_with(|| value.clone());
    }
    merged
}

fn prefer_non_empty(a: &str, b: &str) -> String {
    let chosen = if a.trim().is_empty() { b } else { a };
    chosen.to_string()
}

fn prefer_some(a: Option<&String>, b: Option<&String>) -> Option<String> {
    a.filter(|value| !value.trim().is_empty())
        .or_else(|| b.filter(|value| !value.trim().is_empty()))
        .cloned()
}

/// Path and method pairs of a document, for comparing merge results.
#[must_use]
pub fn operation_keys(document: &OpenApiDocument) -> Vec<(String, HttpMethod)> {
    document
        .operations()
        .map(|(path, method, _)| (path.to_string(), method))
        .collect()
}

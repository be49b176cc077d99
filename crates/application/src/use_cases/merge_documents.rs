//! Merge documents use case.

use serde_json::Value;
use tracing::warn;
use trawl_domain::{ExportFormat, ExportResult, ExportWarning, OpenApiDocument, export_filename};

use crate::document_merge::merge_raw;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{DocumentSerializer, DocumentSource, SerializeError, SourceError};

/// Output of a merge.
#[derive(Debug, Clone)]
pub struct MergeDocumentsOutput {
    /// The merged document.
    pub document: OpenApiDocument,
    /// Serialized text, suggested filename and warnings.
    pub result: ExportResult,
}

/// Loads two documents, merges them and serializes the result.
pub struct MergeDocuments<W: DocumentSerializer> {
    serializer: W,
}

impl<W: DocumentSerializer> MergeDocuments<W> {
    /// Creates a new `MergeDocuments` use case.
    #[must_use]
    pub const fn new(serializer: W) -> Self {
        Self { serializer }
    }

    /// Executes the merge of `a` and `b`; `a` wins conflicts.
    ///
    /// A source whose content cannot be decoded counts as unusable and is
    /// reported as a warning.
    ///
    /// # Errors
    /// - Returns error if a source cannot be read
    /// - Returns error if the merged document cannot be serialized
    pub fn execute<A: DocumentSource, B: DocumentSource>(
        &self,
        a: &A,
        b: &B,
        format: ExportFormat,
    ) -> ApplicationResult<MergeDocumentsOutput> {
        let mut warnings: Vec<ExportWarning> = Vec::new();
        let raw_a = load_lenient(a, &mut warnings)?;
        let raw_b = load_lenient(b, &mut warnings)?;

        let report = merge_raw(&raw_a, &raw_b);
        warnings.extend(report.warnings);
        let document = report.document;

        let tree = serde_json::to_value(&document)
            .map_err(|e| ApplicationError::Serialization(SerializeError::Json(e.to_string())))?;
        let content = self.serializer.serialize(&tree, format)?;

        let mut result = ExportResult::new(
            content,
            format,
            export_filename(&document.info.title, format),
            0,
        );
        result.warnings = warnings;

        Ok(MergeDocumentsOutput { document, result })
    }
}

fn load_lenient<S: DocumentSource>(
    source: &S,
    warnings: &mut Vec<ExportWarning>,
) -> ApplicationResult<Value> {
    match source.load() {
        Ok(value) => Ok(value),
        Err(SourceError::Parse { source_name, message }) => {
            warn!(source = %source_name, %message, "Treating undecodable document as absent");
            warnings.push(
                ExportWarning::new(format!("Undecodable document: {message}"))
                    .with_source(source_name),
            );
            Ok(Value::Null)
        }
        Err(error) => Err(error.into()),
    }
}

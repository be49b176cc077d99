//! Export OpenAPI use case.

use tracing::info;
use trawl_domain::{
    ExchangeRecord, ExportFormat, ExportResult, GenerationOptions, OpenApiDocument,
    export_filename,
};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{DocumentSerializer, ExchangeSource, SerializeError};
use crate::swagger::render;
use crate::synthesis::DocumentBuilder;

/// Input for exporting a document.
#[derive(Debug, Clone, Default)]
pub struct ExportOpenApiInput {
    /// Generation options.
    pub options: GenerationOptions,
    /// Output format.
    pub format: ExportFormat,
}

/// Output of an export.
#[derive(Debug, Clone)]
pub struct ExportOpenApiOutput {
    /// The synthesized `OpenAPI` 3 document, before target rendering.
    pub document: OpenApiDocument,
    /// Serialized text, suggested filename and warnings.
    pub result: ExportResult,
}

/// Loads records from sources, synthesizes a document and serializes it.
pub struct ExportOpenApi<W: DocumentSerializer> {
    serializer: W,
}

impl<W: DocumentSerializer> ExportOpenApi<W> {
    /// Creates a new `ExportOpenApi` use case.
    #[must_use]
    pub const fn new(serializer: W) -> Self {
        Self { serializer }
    }

    /// Executes the export.
    ///
    /// Records from all sources are concatenated in source order.
    ///
    /// # Errors
    /// - Returns error if a source cannot be loaded
    /// - Returns error if the document cannot be serialized
    pub fn execute<S: ExchangeSource>(
        &self,
        sources: &[S],
        input: &ExportOpenApiInput,
    ) -> ApplicationResult<ExportOpenApiOutput> {
        let mut records: Vec<ExchangeRecord> = Vec::new();
        for source in sources {
            let loaded = source.load()?;
            info!(source = %source.describe(), records = loaded.len(), "Loaded records");
            records.extend(loaded);
        }

        let report = DocumentBuilder::new(input.options.clone()).build(&records)?;
        let rendered = serde_json::to_value(render(&report.document, input.options.target))
            .map_err(|e| ApplicationError::Serialization(SerializeError::Json(e.to_string())))?;
        let content = self.serializer.serialize(&rendered, input.format)?;

        let mut result = ExportResult::new(
            content,
            input.format,
            export_filename(&input.options.title, input.format),
            report.record_count,
        );
        result.warnings = report.warnings;

        Ok(ExportOpenApiOutput {
            document: report.document,
            result,
        })
    }
}

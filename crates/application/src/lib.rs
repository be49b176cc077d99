//! Trawl Application - OpenAPI synthesis and merge engine
//!
//! This crate turns captured exchanges into an `OpenAPI` document and merges
//! existing documents. Everything here is synchronous and free of I/O;
//! records and documents arrive through the ports in [`ports`].

pub mod document_merge;
pub mod error;
pub mod ports;
pub mod swagger;
pub mod synthesis;
pub mod use_cases;

pub use document_merge::{MergeReport, merge, merge_raw, normalize};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{DocumentSerializer, DocumentSource, ExchangeSource, SerializeError, SourceError};
pub use swagger::{RenderedDocument, downgrade, render, upgrade};
pub use synthesis::{BuildReport, DocumentBuilder, OperationSynthesizer, ParameterExtractor};
pub use use_cases::{
    ExportOpenApi, ExportOpenApiInput, ExportOpenApiOutput, MergeDocuments, MergeDocumentsOutput,
};

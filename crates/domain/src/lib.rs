//! Trawl Domain - Core types
//!
//! This crate defines the data model of the traffic-to-OpenAPI engine:
//! captured exchanges, inferred schemas, the `OpenAPI` document and the
//! generation options. All types here are pure Rust with no I/O dependencies.

pub mod document;
pub mod error;
pub mod exchange;
pub mod export;
pub mod id;
pub mod options;
pub mod request;
pub mod response;
pub mod schema;

pub use document::{
    Components, ExtensibleMap, Extensions, Info, MediaType, OPENAPI_VERSION, OpenApiDocument,
    Operation, Parameter, ParameterLocation, PathItem, Paths, ReferenceOr, RequestBody, Response,
    Responses, Server, Tag, UNGROUPED_TAG,
};
pub use error::{DomainError, DomainResult};
pub use exchange::{ExchangeRecord, HeaderMap};
pub use export::{
    ExportFormat, ExportResult, ExportWarning, WarningSeverity, export_filename, sanitize_title,
};
pub use id::generate_id;
pub use options::{AUTO_SERVER_URL, GenerationOptions, SpecVersion};
pub use request::HttpMethod;
pub use response::StatusCode;
pub use schema::{ObjectSchema, Schema, SchemaKind, StringFormat};

//! Document synthesis from captured exchanges.
//!
//! The pipeline runs bottom-up: URLs become path templates, values become
//! schemas, samples merge into one schema per slot, partitions become
//! operations and operations become a document.

mod builder;
pub mod inference;
mod operation;
mod parameters;
pub mod path_template;
pub mod schema_merge;

pub use builder::{BuildReport, DocumentBuilder};
pub use inference::{infer_schema, normalize_body};
pub use operation::{
    DOCUMENTED_RESPONSE_HEADERS, OperationSynthesizer, is_documented_header, operation_tags,
    representative,
};
pub use parameters::{DEFAULT_CONTENT_TYPE, ParameterExtractor};
pub use path_template::{PathParameter, PathTemplate, SegmentKind};
pub use schema_merge::merge_schemas;

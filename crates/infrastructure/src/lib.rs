//! Trawl Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: record importers, document files,
//! serde-backed serializers, option files and output writing.

pub mod adapters;
pub mod config;
pub mod documents;
pub mod import;
pub mod output;
pub mod serialization;

pub use adapters::SerdeDocumentSerializer;
pub use config::{ConfigError, load_options};
pub use documents::DocumentFile;
pub use import::{HarArchive, ImportError, JsonRecordFile, parse_har, parse_records};
pub use output::write_export;
pub use serialization::{
    SerializationError, decode_tree, encode, from_json, from_yaml, to_json_pretty, to_yaml,
};

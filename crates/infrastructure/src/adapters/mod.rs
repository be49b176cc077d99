//! Port adapters

mod serde_serializer;

pub use serde_serializer::SerdeDocumentSerializer;

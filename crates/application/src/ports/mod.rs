//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the engine and the outside world.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod serializer;
mod source;

pub use serializer::{DocumentSerializer, SerializeError};
pub use source::{DocumentSource, ExchangeSource, SourceError};

//! Application use cases (engine orchestration).

mod export_openapi;
mod merge_documents;

pub use export_openapi::*;
pub use merge_documents::*;

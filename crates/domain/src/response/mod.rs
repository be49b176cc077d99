//! Response-side HTTP types.

mod status;

pub use status::StatusCode;

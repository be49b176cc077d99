//! Request-side HTTP types.

mod method;

pub use method::HttpMethod;

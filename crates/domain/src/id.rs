//! ID generation utilities.

use uuid::Uuid;

/// Generates a new exchange record identifier.
///
/// UUID v7 embeds the capture time, so ids sort in capture order.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

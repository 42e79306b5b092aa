//! Offerwall value objects

use serde::{Deserialize, Serialize};

/// Participation result reported by an offerwall backend
///
/// `code` follows the vendor convention: negative codes are failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    /// Vendor result code
    pub code: i32,
    /// Vendor payload
    pub data: String,
}

impl Participation {
    /// Create a participation result
    pub fn new(code: i32, data: impl Into<String>) -> Self {
        Self {
            code,
            data: data.into(),
        }
    }

    /// Whether the vendor reported success
    pub fn is_success(&self) -> bool {
        self.code >= 0
    }
}

//! Analytics value objects

use serde::{Deserialize, Serialize};

/// One named parameter attached to an analytics event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsParameter {
    /// Parameter name
    pub key: String,
    /// Parameter value
    pub value: serde_json::Value,
}

impl AnalyticsParameter {
    /// Create a parameter from any JSON-convertible value
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

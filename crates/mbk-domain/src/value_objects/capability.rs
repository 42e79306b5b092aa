//! Capability kinds
//!
//! The closed set of backend capability categories. Each kind has exactly one
//! abstract contract in [`crate::ports::providers`] and zero or more concrete
//! implementations registered under distinct [`ProviderKey`](super::ProviderKey)s.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of backend functionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Backend SDK lifecycle (initialization and readiness)
    Provider,
    /// User authentication
    Auth,
    /// Event analytics
    Analytics,
    /// Persistent document storage
    DataStore,
    /// Display advertising
    Ads,
    /// Reward participation (offerwall)
    Offerwall,
}

impl CapabilityKind {
    /// Every capability kind, in declaration order
    pub const ALL: [CapabilityKind; 6] = [
        CapabilityKind::Provider,
        CapabilityKind::Auth,
        CapabilityKind::Analytics,
        CapabilityKind::DataStore,
        CapabilityKind::Ads,
        CapabilityKind::Offerwall,
    ];

    /// Stable lowercase name used in logs and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Provider => "provider",
            CapabilityKind::Auth => "auth",
            CapabilityKind::Analytics => "analytics",
            CapabilityKind::DataStore => "data_store",
            CapabilityKind::Ads => "ads",
            CapabilityKind::Offerwall => "offerwall",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

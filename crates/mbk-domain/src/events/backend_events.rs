//! Backend events
//!
//! Events published for listeners that are not awaiting the originating call
//! directly: initialization progress, ad errors and ad revenue.

use crate::value_objects::{AdFormat, ProviderKey, ResourceState};
use serde::{Deserialize, Serialize};

/// System-wide backend event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackendEvent {
    /// A provider's initialize call completed
    ProviderInitialized {
        /// Provider key
        key: ProviderKey,
    },
    /// A provider's initialize call rejected
    InitializationFailed {
        /// Provider key
        key: ProviderKey,
        /// Failure detail
        message: String,
    },
    /// Every registered provider reported ready
    AllProvidersReady {
        /// Number of providers that were awaited
        provider_count: usize,
    },
    /// An ad unit changed lifecycle state
    AdStateChanged {
        /// Ad unit identifier
        unit_id: String,
        /// New state
        state: ResourceState,
    },
    /// An ad unit failed to load or show
    AdError {
        /// Ad unit identifier
        unit_id: String,
        /// Unit format
        format: AdFormat,
        /// Failure detail
        message: String,
    },
    /// An ad unit reported a paid impression
    AdRevenue {
        /// Ad unit identifier
        unit_id: String,
        /// Revenue amount (eCPM / 1000)
        amount: f64,
    },
}

impl BackendEvent {
    /// Whether this event reports a failure
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            BackendEvent::InitializationFailed { .. } | BackendEvent::AdError { .. }
        )
    }
}

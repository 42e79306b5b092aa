//! Analytics Port

use crate::value_objects::{AnalyticsParameter, ProviderKey};

/// Backend analytics contract
pub trait BackendAnalytics: Send + Sync {
    /// Key this implementation is registered under
    fn provider_key(&self) -> &ProviderKey;

    /// Record a named event with parameters
    fn log_event(&self, name: &str, parameters: &[AnalyticsParameter]);
}

//! Simulated analytics
//!
//! Events are traced and kept in memory so callers can inspect what would
//! have been sent.

use mbk_domain::ports::providers::BackendAnalytics;
use mbk_domain::value_objects::{AnalyticsParameter, ProviderKey};
use parking_lot::Mutex;
use tracing::info;

/// One logged analytics event
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    /// Event name
    pub name: String,
    /// Event parameters, in call order
    pub parameters: Vec<AnalyticsParameter>,
}

impl RecordedEvent {
    /// Value of a parameter by name
    pub fn parameter(&self, key: &str) -> Option<&serde_json::Value> {
        self.parameters
            .iter()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }
}

/// Analytics that records events in memory
#[derive(Debug)]
pub struct SimulatedAnalytics {
    key: ProviderKey,
    events: Mutex<Vec<RecordedEvent>>,
}

impl SimulatedAnalytics {
    /// Create an analytics registered under `key`
    pub fn new(key: ProviderKey) -> Self {
        Self {
            key,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the recorded events
    pub fn recorded(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events
    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl BackendAnalytics for SimulatedAnalytics {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn log_event(&self, name: &str, parameters: &[AnalyticsParameter]) {
        info!(
            provider = %self.key,
            event = name,
            parameters = parameters.len(),
            "Analytics event"
        );
        self.events.lock().push(RecordedEvent {
            name: name.to_owned(),
            parameters: parameters.to_vec(),
        });
    }
}

//! Lifecycle states for providers and display resources

use serde::{Deserialize, Serialize};

/// Initialization state of one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InitState {
    /// Initialize has not been called
    #[default]
    NotStarted,
    /// Initialize is in flight
    Initializing,
    /// Initialize completed
    Ready,
    /// Initialize rejected
    Failed,
}

/// Lifecycle state of one display resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ResourceState {
    /// No underlying object is loaded
    #[default]
    Idle,
    /// A load request is in flight
    Loading,
    /// Ready to show
    Loaded,
    /// The last load was rejected
    Failed,
    /// Show has been issued
    Showing,
    /// Both completion signals arrived; a reload follows
    Consumed,
    /// A persistent resource was hidden and destroyed
    Hidden,
}

impl ResourceState {
    /// Whether a load is still in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, ResourceState::Loading)
    }
}

/// What a `load` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The resource finished loading
    Loaded,
    /// Another load was already in flight; nothing was issued
    AlreadyLoading,
    /// The owning provider is not ready; nothing was issued
    Skipped,
}

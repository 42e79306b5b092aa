//! Advertising Port
//!
//! Banner, interstitial and rewarded flows. Loads and shows suspend until the
//! vendor answers; failures are returned to the caller and also published on
//! the event stream for listeners that are not awaiting the call.

use crate::error::Result;
use crate::events::BackendEvent;
use crate::value_objects::{LoadOutcome, ProviderKey};
use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Caller callback invoked once a consumption cycle completes
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Backend advertising contract
#[async_trait]
pub trait BackendAds: Send + Sync {
    /// Key this implementation is registered under
    fn provider_key(&self) -> &ProviderKey;

    /// Load (replacing) the banner
    async fn load_banner(&self, cancel: CancellationToken) -> Result<LoadOutcome>;

    /// Display the banner, loading it first if needed
    async fn show_banner(&self, cancel: CancellationToken) -> Result<()>;

    /// Hide and destroy the banner
    fn hide_banner(&self);

    /// Load the interstitial
    async fn load_interstitial(&self, cancel: CancellationToken) -> Result<LoadOutcome>;

    /// Show the interstitial; `on_complete` runs once it was shown and closed
    async fn show_interstitial(
        &self,
        on_complete: CompletionCallback,
        cancel: CancellationToken,
    ) -> Result<()>;

    /// Whether the interstitial is loaded
    fn is_interstitial_ready(&self) -> bool;

    /// Load the rewarded unit
    async fn load_rewarded(&self, cancel: CancellationToken) -> Result<LoadOutcome>;

    /// Show the rewarded unit; `on_rewarded` runs once it paid out and closed
    async fn show_rewarded(
        &self,
        on_rewarded: CompletionCallback,
        cancel: CancellationToken,
    ) -> Result<()>;

    /// Whether the rewarded unit is loaded
    fn is_rewarded_ready(&self) -> bool;

    /// Subscribe to ad error, revenue and state events
    fn subscribe(&self) -> broadcast::Receiver<BackendEvent>;
}

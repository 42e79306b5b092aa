//! Managed Ads
//!
//! [`BackendAds`] over any [`AdNetwork`]: one persistent banner controller
//! and two consumable controllers (interstitial, rewarded) sharing one event
//! bus. Once the owning provider reports ready, all three units are loaded
//! concurrently without waiting for a caller to ask.

use super::AdUnitSet;
use super::controller::AdUnitController;
use crate::events::{BackendEventStream, EventBus};
use async_trait::async_trait;
use futures::future::join_all;
use mbk_domain::error::{Error, Result};
use mbk_domain::events::BackendEvent;
use mbk_domain::ports::providers::{BackendAds, CompletionCallback};
use mbk_domain::ports::vendor::AdNetwork;
use mbk_domain::value_objects::{LoadOutcome, ProviderKey};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Advertising capability built from lifecycle controllers
pub struct ManagedAds {
    key: ProviderKey,
    banner: Arc<AdUnitController>,
    interstitial: Arc<AdUnitController>,
    rewarded: Arc<AdUnitController>,
    events: EventBus,
    shutdown: CancellationToken,
}

impl ManagedAds {
    /// Create the controllers and start the preload watcher
    ///
    /// Fails outside a tokio runtime.
    pub fn new(
        key: ProviderKey,
        readiness: watch::Receiver<bool>,
        network: Arc<dyn AdNetwork>,
        units: AdUnitSet,
    ) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|_| Error::internal(format!("ads for '{key}' need a tokio runtime")))?;
        let events = EventBus::new();
        let controller = |spec| {
            AdUnitController::new(
                spec,
                key.clone(),
                readiness.clone(),
                Arc::clone(&network),
                events.clone(),
            )
        };
        let ads = Self {
            banner: controller(units.banner)?,
            interstitial: controller(units.interstitial)?,
            rewarded: controller(units.rewarded)?,
            key: key.clone(),
            events,
            shutdown: CancellationToken::new(),
        };
        ads.spawn_preload(&runtime, readiness);
        Ok(ads)
    }

    fn spawn_preload(&self, runtime: &Handle, mut readiness: watch::Receiver<bool>) {
        let units = self.controllers();
        let shutdown = self.shutdown.clone();
        let key = self.key.clone();
        runtime.spawn(async move {
            let became_ready = tokio::select! {
                () = shutdown.cancelled() => false,
                ready = readiness.wait_for(|ready| *ready) => ready.is_ok(),
            };
            if !became_ready {
                debug!(provider = %key, "Ad preload abandoned before provider was ready");
                return;
            }
            match load_units(&units, shutdown.child_token()).await {
                Ok(()) => info!(provider = %key, "All ads loaded"),
                Err(e) if e.is_cancelled() => info!(provider = %key, "Ad loading was cancelled"),
                Err(e) => error!(provider = %key, error = %e, "Ad loading failed"),
            }
        });
    }

    /// Banner controller
    pub fn banner(&self) -> &Arc<AdUnitController> {
        &self.banner
    }

    /// Interstitial controller
    pub fn interstitial(&self) -> &Arc<AdUnitController> {
        &self.interstitial
    }

    /// Rewarded controller
    pub fn rewarded(&self) -> &Arc<AdUnitController> {
        &self.rewarded
    }

    /// All controllers: banner, interstitial, rewarded
    pub fn controllers(&self) -> [Arc<AdUnitController>; 3] {
        [
            Arc::clone(&self.banner),
            Arc::clone(&self.interstitial),
            Arc::clone(&self.rewarded),
        ]
    }

    /// Load all units concurrently
    pub async fn load_all(&self, cancel: CancellationToken) -> Result<()> {
        load_units(&self.controllers(), cancel).await
    }

    /// Events from every controller as one stream
    pub fn event_stream(&self) -> BackendEventStream {
        self.events.subscribe_stream()
    }

    /// Stop the preload watcher and dispose every controller; idempotent
    pub fn dispose(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();
        for controller in self.controllers() {
            controller.dispose();
        }
        debug!(provider = %self.key, "Managed ads disposed");
    }
}

async fn load_units(units: &[Arc<AdUnitController>], cancel: CancellationToken) -> Result<()> {
    join_all(units.iter().map(|unit| unit.load(cancel.clone())))
        .await
        .into_iter()
        .try_for_each(|outcome| outcome.map(|_| ()))
}

impl Drop for ManagedAds {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ManagedAds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedAds")
            .field("provider", &self.key)
            .field("banner", &self.banner)
            .field("interstitial", &self.interstitial)
            .field("rewarded", &self.rewarded)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BackendAds for ManagedAds {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    async fn load_banner(&self, cancel: CancellationToken) -> Result<LoadOutcome> {
        self.banner.load(cancel).await
    }

    async fn show_banner(&self, cancel: CancellationToken) -> Result<()> {
        self.banner.display(cancel).await
    }

    fn hide_banner(&self) {
        if let Err(e) = self.banner.hide() {
            warn!(provider = %self.key, error = %e, "Banner hide rejected");
        }
    }

    async fn load_interstitial(&self, cancel: CancellationToken) -> Result<LoadOutcome> {
        self.interstitial.load(cancel).await
    }

    async fn show_interstitial(
        &self,
        on_complete: CompletionCallback,
        cancel: CancellationToken,
    ) -> Result<()> {
        self.interstitial.show(on_complete, cancel).await
    }

    fn is_interstitial_ready(&self) -> bool {
        self.interstitial.is_ready()
    }

    async fn load_rewarded(&self, cancel: CancellationToken) -> Result<LoadOutcome> {
        self.rewarded.load(cancel).await
    }

    async fn show_rewarded(
        &self,
        on_rewarded: CompletionCallback,
        cancel: CancellationToken,
    ) -> Result<()> {
        self.rewarded.show(on_rewarded, cancel).await
    }

    fn is_rewarded_ready(&self) -> bool {
        self.rewarded.is_ready()
    }

    fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.events.subscribe()
    }
}

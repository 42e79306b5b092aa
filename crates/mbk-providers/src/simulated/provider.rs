//! Simulated provider
//!
//! Initialize sleeps for the configured duration. Readiness follows after a
//! further delay on a background task, the way a vendor SDK waits for a
//! consent form before it can serve.

use super::SimulatedSettings;
use async_trait::async_trait;
use mbk_domain::error::{Error, Result};
use mbk_domain::ports::providers::{BackendProvider, ReadinessFlag};
use mbk_domain::value_objects::ProviderKey;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Provider with scripted initialize and readiness latency
pub struct SimulatedProvider {
    key: ProviderKey,
    init_delay: Duration,
    ready_delay: Duration,
    fail_init: Option<String>,
    initialized: AtomicBool,
    init_lock: Mutex<()>,
    init_calls: AtomicUsize,
    readiness: Arc<ReadinessFlag>,
    shutdown: CancellationToken,
}

impl SimulatedProvider {
    /// Create a provider registered under `key`
    pub fn new(key: ProviderKey, settings: &SimulatedSettings) -> Self {
        Self {
            key,
            init_delay: settings.init_delay,
            ready_delay: settings.ready_delay,
            fail_init: settings.fail_init.clone(),
            initialized: AtomicBool::new(false),
            init_lock: Mutex::new(()),
            init_calls: AtomicUsize::new(0),
            readiness: Arc::new(ReadinessFlag::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Number of initialize calls that did real work
    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// Whether initialize has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn schedule_ready(&self) {
        if self.ready_delay.is_zero() {
            self.readiness.set_ready();
            return;
        }
        let flag = Arc::clone(&self.readiness);
        let delay = self.ready_delay;
        let shutdown = self.shutdown.clone();
        let key = self.key.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = shutdown.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    flag.set_ready();
                    info!(provider = %key, "Simulated consent resolved, provider ready");
                }
            }
        });
    }
}

#[async_trait]
impl BackendProvider for SimulatedProvider {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn name(&self) -> &str {
        "simulated"
    }

    async fn initialize(&self, cancel: CancellationToken) -> Result<()> {
        let _guard = self.init_lock.lock().await;
        if self.is_initialized() {
            debug!(provider = %self.key, "Already initialized");
            return Ok(());
        }
        self.init_calls.fetch_add(1, Ordering::SeqCst);

        tokio::select! {
            () = cancel.cancelled() => {
                return Err(Error::cancelled(format!("initialize of provider '{}'", self.key)));
            }
            () = tokio::time::sleep(self.init_delay) => {}
        }
        if let Some(message) = &self.fail_init {
            return Err(Error::internal(message.clone()));
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!(provider = %self.key, "Simulated SDK initialized");
        self.schedule_ready();
        Ok(())
    }

    fn readiness(&self) -> watch::Receiver<bool> {
        self.readiness.subscribe()
    }
}

impl Drop for SimulatedProvider {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for SimulatedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedProvider")
            .field("key", &self.key)
            .field("initialized", &self.is_initialized())
            .field("ready", &self.readiness.get())
            .finish_non_exhaustive()
    }
}

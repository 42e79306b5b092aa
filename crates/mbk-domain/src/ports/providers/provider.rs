//! Backend Provider Port
//!
//! Whole-backend SDK lifecycle: asynchronous initialization plus a readiness
//! flag with change notification. A provider may complete `initialize` before
//! its readiness flag flips (for example while a consent flow is pending), so
//! callers that need the backend usable must watch [`BackendProvider::readiness`].

use crate::error::Result;
use crate::value_objects::ProviderKey;
use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Backend SDK lifecycle contract
#[async_trait]
pub trait BackendProvider: Send + Sync {
    /// Key this provider is registered under
    fn provider_key(&self) -> &ProviderKey;

    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Initialize the backend SDK
    ///
    /// Must be idempotent: calling it on an already initialized provider
    /// returns `Ok(())` without re-initializing.
    async fn initialize(&self, cancel: CancellationToken) -> Result<()>;

    /// Subscribe to the readiness flag
    fn readiness(&self) -> watch::Receiver<bool>;

    /// Current value of the readiness flag
    fn is_ready(&self) -> bool {
        *self.readiness().borrow()
    }
}

/// Readiness flag with change notification
///
/// Notifies subscribers only when the value actually changes.
#[derive(Debug)]
pub struct ReadinessFlag {
    sender: watch::Sender<bool>,
}

impl ReadinessFlag {
    /// Create a flag that starts not ready
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Set the flag, notifying subscribers on change
    pub fn set(&self, ready: bool) {
        self.sender.send_if_modified(|current| {
            if *current == ready {
                false
            } else {
                *current = ready;
                true
            }
        });
    }

    /// Mark ready
    pub fn set_ready(&self) {
        self.set(true);
    }

    /// Current value
    pub fn get(&self) -> bool {
        *self.sender.borrow()
    }

    /// Subscribe to changes
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl Default for ReadinessFlag {
    fn default() -> Self {
        Self::new()
    }
}

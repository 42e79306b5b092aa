//! Null provider
//!
//! A provider that is ready from construction and whose initialize call
//! completes immediately.

use async_trait::async_trait;
use mbk_domain::error::Result;
use mbk_domain::ports::providers::{BackendProvider, ReadinessFlag};
use mbk_domain::value_objects::ProviderKey;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Provider that is always ready
///
/// # Example
///
/// ```rust
/// use mbk_domain::ports::providers::BackendProvider;
/// use mbk_domain::value_objects::ProviderKey;
/// use mbk_providers::null::NullProvider;
///
/// let provider = NullProvider::new(ProviderKey::none());
/// assert!(provider.is_ready());
/// ```
#[derive(Debug)]
pub struct NullProvider {
    key: ProviderKey,
    readiness: ReadinessFlag,
}

impl NullProvider {
    /// Create a null provider registered under `key`
    pub fn new(key: ProviderKey) -> Self {
        let readiness = ReadinessFlag::new();
        readiness.set_ready();
        Self { key, readiness }
    }
}

impl Default for NullProvider {
    fn default() -> Self {
        Self::new(ProviderKey::none())
    }
}

#[async_trait]
impl BackendProvider for NullProvider {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn name(&self) -> &str {
        "null"
    }

    async fn initialize(&self, _cancel: CancellationToken) -> Result<()> {
        Ok(())
    }

    fn readiness(&self) -> watch::Receiver<bool> {
        self.readiness.subscribe()
    }
}

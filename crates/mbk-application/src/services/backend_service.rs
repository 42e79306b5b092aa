//! Backend Service
//!
//! Per-capability accessors over a [`BackendSelector`], so callers write
//! `service.auth(None)?` instead of naming trait objects.

use super::selector::BackendSelector;
use crate::registry::ProviderRegistry;
use mbk_domain::error::Result;
use mbk_domain::ports::providers::{
    BackendAds, BackendAnalytics, BackendAuth, BackendDataStore, BackendOfferwall,
    BackendProvider,
};
use mbk_domain::value_objects::ProviderKey;
use std::sync::Arc;

/// Capability accessors backed by a selector
#[derive(Debug, Clone)]
pub struct BackendService {
    selector: BackendSelector,
}

impl BackendService {
    /// Create a service over a selector
    pub fn new(selector: BackendSelector) -> Self {
        Self { selector }
    }

    /// Create a service over a registry with the `NONE` fallback
    pub fn from_registry(registry: Arc<ProviderRegistry>) -> Self {
        Self::new(BackendSelector::with_default_fallback(registry))
    }

    /// Underlying selector
    pub fn selector(&self) -> &BackendSelector {
        &self.selector
    }

    /// Backend lifecycle implementation
    pub fn provider(&self, key: Option<&ProviderKey>) -> Result<Arc<dyn BackendProvider>> {
        self.selector.resolve(key)
    }

    /// Authentication implementation
    pub fn auth(&self, key: Option<&ProviderKey>) -> Result<Arc<dyn BackendAuth>> {
        self.selector.resolve(key)
    }

    /// Analytics implementation
    pub fn analytics(&self, key: Option<&ProviderKey>) -> Result<Arc<dyn BackendAnalytics>> {
        self.selector.resolve(key)
    }

    /// Document storage implementation
    pub fn data_store(&self, key: Option<&ProviderKey>) -> Result<Arc<dyn BackendDataStore>> {
        self.selector.resolve(key)
    }

    /// Advertising implementation
    pub fn ads(&self, key: Option<&ProviderKey>) -> Result<Arc<dyn BackendAds>> {
        self.selector.resolve(key)
    }

    /// Reward participation implementation
    pub fn offerwall(&self, key: Option<&ProviderKey>) -> Result<Arc<dyn BackendOfferwall>> {
        self.selector.resolve(key)
    }
}

//! Null capability services

use crate::constants::{NULL_OFFERWALL_CODE, NULL_OFFERWALL_DATA};
use async_trait::async_trait;
use mbk_domain::error::Result;
use mbk_domain::ports::providers::{
    BackendAnalytics, BackendAuth, BackendDataStore, BackendOfferwall,
};
use mbk_domain::value_objects::{AnalyticsParameter, AuthState, Participation, ProviderKey};
use tokio::sync::watch;
use tracing::debug;

/// Auth that declines every sign-in
#[derive(Debug)]
pub struct NullAuth {
    key: ProviderKey,
    state: watch::Sender<AuthState>,
}

impl NullAuth {
    /// Create a null auth registered under `key`
    pub fn new(key: ProviderKey) -> Self {
        let (state, _) = watch::channel(AuthState::signed_out());
        Self { key, state }
    }
}

#[async_trait]
impl BackendAuth for NullAuth {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn is_signed_in(&self) -> bool {
        false
    }

    fn user_id(&self) -> Option<String> {
        None
    }

    async fn sign_in_anonymously(&self) -> Result<bool> {
        Ok(false)
    }

    async fn sign_in_with_email(&self, _email: &str, _password: &str) -> Result<bool> {
        Ok(false)
    }

    async fn sign_up_with_email(&self, _email: &str, _password: &str) -> Result<bool> {
        Ok(false)
    }

    async fn sign_in_with_platform(&self, _token: &str) -> Result<bool> {
        Ok(false)
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(())
    }

    fn auth_state(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

/// Analytics that drops every event
#[derive(Debug, Clone)]
pub struct NullAnalytics {
    key: ProviderKey,
}

impl NullAnalytics {
    /// Create a null analytics registered under `key`
    pub fn new(key: ProviderKey) -> Self {
        Self { key }
    }
}

impl BackendAnalytics for NullAnalytics {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn log_event(&self, name: &str, _parameters: &[AnalyticsParameter]) {
        debug!(event = name, "Analytics event dropped by null backend");
    }
}

/// Data store that holds nothing
///
/// Loads always miss, saves are accepted and discarded.
#[derive(Debug, Clone)]
pub struct NullDataStore {
    key: ProviderKey,
}

impl NullDataStore {
    /// Create a null data store registered under `key`
    pub fn new(key: ProviderKey) -> Self {
        Self { key }
    }
}

#[async_trait]
impl BackendDataStore for NullDataStore {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    async fn load(&self, _collection: &str, _document_id: &str) -> Result<Option<serde_json::Value>> {
        Ok(None)
    }

    async fn save(
        &self,
        _collection: &str,
        _document_id: &str,
        _data: serde_json::Value,
    ) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _collection: &str, _document_id: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Offerwall that is never available
#[derive(Debug, Clone)]
pub struct NullOfferwall {
    key: ProviderKey,
}

impl NullOfferwall {
    /// Create a null offerwall registered under `key`
    pub fn new(key: ProviderKey) -> Self {
        Self { key }
    }
}

#[async_trait]
impl BackendOfferwall for NullOfferwall {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn start_offerwall(&self, user_id: &str) -> Result<()> {
        debug!(user_id, "Offerwall requested from null backend");
        Ok(())
    }

    async fn rewards(&self, _user_id: &str) -> Result<Participation> {
        Ok(Participation::new(NULL_OFFERWALL_CODE, NULL_OFFERWALL_DATA))
    }
}

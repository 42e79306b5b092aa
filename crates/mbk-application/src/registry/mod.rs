//! Provider Registry
//!
//! Maps `(capability kind, provider key)` to one implementation. The
//! registry is assembled once through [`ProviderRegistryBuilder`] and is
//! immutable afterwards; resolution goes through
//! [`BackendSelector`](crate::services::BackendSelector).
//!
//! Backends contribute their implementations through the [`catalog`]
//! distributed slice.

pub mod capability;
pub mod catalog;
pub mod table;

pub use capability::{Capability, CapabilityImpl};
pub use catalog::{
    BACKENDS, BackendEntry, BackendEntryConfig, find_backend, list_backends, register_backends,
};
pub use table::{Insertion, KindTable};

use mbk_domain::error::{Error, Result};
use mbk_domain::ports::providers::{
    BackendAds, BackendAnalytics, BackendAuth, BackendDataStore, BackendOfferwall,
    BackendProvider,
};
use mbk_domain::value_objects::{CapabilityKind, ProviderKey};
use std::sync::Arc;
use tracing::{debug, warn};

/// Immutable capability registry
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    pub(crate) providers: KindTable<dyn BackendProvider>,
    pub(crate) auth: KindTable<dyn BackendAuth>,
    pub(crate) analytics: KindTable<dyn BackendAnalytics>,
    pub(crate) data_stores: KindTable<dyn BackendDataStore>,
    pub(crate) ads: KindTable<dyn BackendAds>,
    pub(crate) offerwalls: KindTable<dyn BackendOfferwall>,
}

impl ProviderRegistry {
    /// Start building a registry
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::new()
    }

    /// Typed lookup of the implementation registered under `key`
    pub fn get<C: Capability + ?Sized>(&self, key: &ProviderKey) -> Result<Arc<C>> {
        C::table(self)
            .get(key)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("{} implementation '{key}'", C::KIND)))
    }

    /// Untyped lookup of the implementation registered under `(kind, key)`
    pub fn lookup(&self, kind: CapabilityKind, key: &ProviderKey) -> Result<CapabilityImpl> {
        match kind {
            CapabilityKind::Provider => self.lookup_as::<dyn BackendProvider>(key),
            CapabilityKind::Auth => self.lookup_as::<dyn BackendAuth>(key),
            CapabilityKind::Analytics => self.lookup_as::<dyn BackendAnalytics>(key),
            CapabilityKind::DataStore => self.lookup_as::<dyn BackendDataStore>(key),
            CapabilityKind::Ads => self.lookup_as::<dyn BackendAds>(key),
            CapabilityKind::Offerwall => self.lookup_as::<dyn BackendOfferwall>(key),
        }
    }

    fn lookup_as<C: Capability + ?Sized>(&self, key: &ProviderKey) -> Result<CapabilityImpl> {
        self.get::<C>(key).map(C::wrap)
    }

    /// Whether `(kind, key)` is registered
    pub fn contains(&self, kind: CapabilityKind, key: &ProviderKey) -> bool {
        self.keys_for(kind).contains(key)
    }

    /// Keys registered for `kind`, in registration order
    pub fn keys_for(&self, kind: CapabilityKind) -> Vec<ProviderKey> {
        match kind {
            CapabilityKind::Provider => Self::keys_of(&self.providers),
            CapabilityKind::Auth => Self::keys_of(&self.auth),
            CapabilityKind::Analytics => Self::keys_of(&self.analytics),
            CapabilityKind::DataStore => Self::keys_of(&self.data_stores),
            CapabilityKind::Ads => Self::keys_of(&self.ads),
            CapabilityKind::Offerwall => Self::keys_of(&self.offerwalls),
        }
    }

    fn keys_of<T: ?Sized>(table: &KindTable<T>) -> Vec<ProviderKey> {
        table.keys().cloned().collect()
    }

    /// First key registered for `kind`
    pub fn default_key(&self, kind: CapabilityKind) -> Option<ProviderKey> {
        self.keys_for(kind).into_iter().next()
    }

    /// Every registered provider lifecycle implementation, in registration order
    pub fn providers(&self) -> Vec<Arc<dyn BackendProvider>> {
        self.providers.values().cloned().collect()
    }

    /// Total number of registrations across all kinds
    pub fn len(&self) -> usize {
        CapabilityKind::ALL
            .iter()
            .map(|kind| self.keys_for(*kind).len())
            .sum()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builder that collects registrations before the registry is frozen
///
/// Duplicate `(kind, key)` registrations are rejected with
/// [`Error::DuplicateKey`] unless overwrites were allowed, in which case the
/// last registration wins and a warning is logged.
#[derive(Debug, Default)]
pub struct ProviderRegistryBuilder {
    registry: ProviderRegistry,
    allow_overwrite: bool,
}

impl ProviderRegistryBuilder {
    /// Create an empty builder that rejects duplicates
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow later registrations to replace earlier ones
    #[must_use]
    pub fn allow_overwrite(mut self, allow: bool) -> Self {
        self.allow_overwrite = allow;
        self
    }

    /// Register a typed implementation under `key`
    pub fn register_capability<C: Capability + ?Sized>(
        &mut self,
        key: ProviderKey,
        implementation: Arc<C>,
    ) -> Result<&mut Self> {
        let allow_overwrite = self.allow_overwrite;
        match C::table_mut(&mut self.registry).insert(key.clone(), implementation, allow_overwrite)
        {
            Insertion::Added => {
                debug!(kind = %C::KIND, key = %key, "Registered implementation");
                Ok(self)
            }
            Insertion::Replaced => {
                warn!(kind = %C::KIND, key = %key, "Replaced previously registered implementation");
                Ok(self)
            }
            Insertion::Rejected => Err(Error::duplicate_key(C::KIND, key)),
        }
    }

    /// Register an untyped implementation under `(kind, key)`
    ///
    /// The implementation's variant must match `kind`.
    pub fn register(
        &mut self,
        kind: CapabilityKind,
        key: ProviderKey,
        implementation: CapabilityImpl,
    ) -> Result<&mut Self> {
        if implementation.kind() != kind {
            return Err(Error::invalid_argument(format!(
                "cannot register a {} implementation as {kind} under '{key}'",
                implementation.kind()
            )));
        }
        match implementation {
            CapabilityImpl::Provider(i) => self.register_capability(key, i),
            CapabilityImpl::Auth(i) => self.register_capability(key, i),
            CapabilityImpl::Analytics(i) => self.register_capability(key, i),
            CapabilityImpl::DataStore(i) => self.register_capability(key, i),
            CapabilityImpl::Ads(i) => self.register_capability(key, i),
            CapabilityImpl::Offerwall(i) => self.register_capability(key, i),
        }
    }

    /// Register a provider lifecycle implementation
    pub fn register_provider(
        &mut self,
        key: ProviderKey,
        provider: Arc<dyn BackendProvider>,
    ) -> Result<&mut Self> {
        self.register_capability(key, provider)
    }

    /// Register an authentication implementation
    pub fn register_auth(
        &mut self,
        key: ProviderKey,
        auth: Arc<dyn BackendAuth>,
    ) -> Result<&mut Self> {
        self.register_capability(key, auth)
    }

    /// Register an analytics implementation
    pub fn register_analytics(
        &mut self,
        key: ProviderKey,
        analytics: Arc<dyn BackendAnalytics>,
    ) -> Result<&mut Self> {
        self.register_capability(key, analytics)
    }

    /// Register a document storage implementation
    pub fn register_data_store(
        &mut self,
        key: ProviderKey,
        store: Arc<dyn BackendDataStore>,
    ) -> Result<&mut Self> {
        self.register_capability(key, store)
    }

    /// Register an advertising implementation
    pub fn register_ads(&mut self, key: ProviderKey, ads: Arc<dyn BackendAds>) -> Result<&mut Self> {
        self.register_capability(key, ads)
    }

    /// Register a reward participation implementation
    pub fn register_offerwall(
        &mut self,
        key: ProviderKey,
        offerwall: Arc<dyn BackendOfferwall>,
    ) -> Result<&mut Self> {
        self.register_capability(key, offerwall)
    }

    /// Keys registered so far for `kind`
    pub fn keys_for(&self, kind: CapabilityKind) -> Vec<ProviderKey> {
        self.registry.keys_for(kind)
    }

    /// Freeze the registry
    pub fn build(self) -> ProviderRegistry {
        debug!(registrations = self.registry.len(), "Provider registry built");
        self.registry
    }
}

//! Capability typing for the registry
//!
//! [`Capability`] ties each capability port trait object to its
//! [`CapabilityKind`] and to the table that stores it, so typed lookups such
//! as `registry.get::<dyn BackendAuth>(&key)` need no downcasting.
//! [`CapabilityImpl`] is the untyped form used by `register(kind, key, impl)`.

use super::ProviderRegistry;
use super::table::KindTable;
use mbk_domain::ports::providers::{
    BackendAds, BackendAnalytics, BackendAuth, BackendDataStore, BackendOfferwall,
    BackendProvider,
};
use mbk_domain::value_objects::CapabilityKind;
use std::fmt;
use std::sync::Arc;

/// A capability port that can be stored in the registry
pub trait Capability: Send + Sync + 'static {
    /// Kind tag of this capability
    const KIND: CapabilityKind;

    /// Table holding implementations of this capability
    fn table(registry: &ProviderRegistry) -> &KindTable<Self>;

    /// Mutable table holding implementations of this capability
    fn table_mut(registry: &mut ProviderRegistry) -> &mut KindTable<Self>;

    /// Wrap an implementation into its untyped form
    fn wrap(implementation: Arc<Self>) -> CapabilityImpl;
}

/// Implementation of any capability kind
#[derive(Clone)]
pub enum CapabilityImpl {
    /// Backend lifecycle
    Provider(Arc<dyn BackendProvider>),
    /// Authentication
    Auth(Arc<dyn BackendAuth>),
    /// Analytics
    Analytics(Arc<dyn BackendAnalytics>),
    /// Document storage
    DataStore(Arc<dyn BackendDataStore>),
    /// Advertising
    Ads(Arc<dyn BackendAds>),
    /// Reward participation
    Offerwall(Arc<dyn BackendOfferwall>),
}

impl CapabilityImpl {
    /// Kind of the wrapped implementation
    pub fn kind(&self) -> CapabilityKind {
        match self {
            CapabilityImpl::Provider(_) => CapabilityKind::Provider,
            CapabilityImpl::Auth(_) => CapabilityKind::Auth,
            CapabilityImpl::Analytics(_) => CapabilityKind::Analytics,
            CapabilityImpl::DataStore(_) => CapabilityKind::DataStore,
            CapabilityImpl::Ads(_) => CapabilityKind::Ads,
            CapabilityImpl::Offerwall(_) => CapabilityKind::Offerwall,
        }
    }
}

impl fmt::Debug for CapabilityImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CapabilityImpl").field(&self.kind()).finish()
    }
}

macro_rules! impl_capability {
    ($port:ident, $kind:ident, $field:ident) => {
        impl Capability for dyn $port {
            const KIND: CapabilityKind = CapabilityKind::$kind;

            fn table(registry: &ProviderRegistry) -> &KindTable<Self> {
                &registry.$field
            }

            fn table_mut(registry: &mut ProviderRegistry) -> &mut KindTable<Self> {
                &mut registry.$field
            }

            fn wrap(implementation: Arc<Self>) -> CapabilityImpl {
                CapabilityImpl::$kind(implementation)
            }
        }
    };
}

impl_capability!(BackendProvider, Provider, providers);
impl_capability!(BackendAuth, Auth, auth);
impl_capability!(BackendAnalytics, Analytics, analytics);
impl_capability!(BackendDataStore, DataStore, data_stores);
impl_capability!(BackendAds, Ads, ads);
impl_capability!(BackendOfferwall, Offerwall, offerwalls);

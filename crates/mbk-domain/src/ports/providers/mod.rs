//! Capability ports
//!
//! One abstract contract per [`CapabilityKind`](crate::value_objects::CapabilityKind).
//!
//! | Kind | Port |
//! |------|------|
//! | Provider | [`BackendProvider`] |
//! | Auth | [`BackendAuth`] |
//! | Analytics | [`BackendAnalytics`] |
//! | DataStore | [`BackendDataStore`] |
//! | Ads | [`BackendAds`] |
//! | Offerwall | [`BackendOfferwall`] |

pub mod ads;
pub mod analytics;
pub mod auth;
pub mod data_store;
pub mod offerwall;
pub mod provider;

pub use ads::{BackendAds, CompletionCallback};
pub use analytics::BackendAnalytics;
pub use auth::BackendAuth;
pub use data_store::{BackendDataStore, DataStoreExt};
pub use offerwall::BackendOfferwall;
pub use provider::{BackendProvider, ReadinessFlag};

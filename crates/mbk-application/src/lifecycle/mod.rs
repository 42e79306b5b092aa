//! Display resource lifecycle
//!
//! Per-unit controllers, the two-signal completion join, and the
//! [`ManagedAds`] capability assembled from them.

pub mod controller;
pub mod join;
pub mod managed_ads;

pub use controller::AdUnitController;
pub use join::PairBarrier;
pub use managed_ads::ManagedAds;

use mbk_domain::value_objects::AdUnitSpec;

/// The three ad units managed for one backend
#[derive(Debug, Clone, PartialEq)]
pub struct AdUnitSet {
    /// Persistent banner unit
    pub banner: AdUnitSpec,
    /// Consumable interstitial unit
    pub interstitial: AdUnitSpec,
    /// Consumable rewarded unit
    pub rewarded: AdUnitSpec,
}

impl AdUnitSet {
    /// Create a set with default placement and primary signals
    pub fn new(
        banner_id: impl Into<String>,
        interstitial_id: impl Into<String>,
        rewarded_id: impl Into<String>,
    ) -> Self {
        Self {
            banner: AdUnitSpec::banner(banner_id),
            interstitial: AdUnitSpec::interstitial(interstitial_id),
            rewarded: AdUnitSpec::rewarded(rewarded_id),
        }
    }
}

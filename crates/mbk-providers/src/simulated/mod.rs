//! Simulated Backend
//!
//! An in-process backend family registered under `SIMULATED`. It behaves
//! like a vendor SDK with latency: initialize takes time, readiness can lag
//! behind initialize (as a consent flow would), and ad units answer loads
//! and shows through the vendor event sink after configurable delays.
//!
//! ## Settings
//!
//! Read from [`BackendEntryConfig::extra`]:
//!
//! | Name | Type | Default |
//! |------|------|---------|
//! | `init_delay_ms` | u64 | 50 |
//! | `ready_delay_ms` | u64 | 0 |
//! | `fail_init` | string | unset |
//! | `load_delay_ms` | u64 | 100 |
//! | `show_delay_ms` | u64 | 200 |
//! | `load_failure_code` | i32 | unset |
//! | `ecpm` | f64 | 4000 |
//!
//! The Ads capability is registered only when the entry config carries ad
//! units.

pub mod ad_network;
pub mod analytics;
pub mod auth;
pub mod data_store;
pub mod offerwall;
pub mod provider;

pub use ad_network::SimulatedAdNetwork;
pub use analytics::{RecordedEvent, SimulatedAnalytics};
pub use auth::SimulatedAuth;
pub use data_store::SimulatedDataStore;
pub use offerwall::SimulatedOfferwall;
pub use provider::SimulatedProvider;

use crate::constants::{
    SIMULATED_DEFAULT_ECPM, SIMULATED_DEFAULT_INIT_DELAY_MS, SIMULATED_DEFAULT_LOAD_DELAY_MS,
    SIMULATED_DEFAULT_READY_DELAY_MS, SIMULATED_DEFAULT_SHOW_DELAY_MS, SIMULATED_ECPM,
    SIMULATED_FAIL_INIT, SIMULATED_INIT_DELAY_MS, SIMULATED_LOAD_DELAY_MS,
    SIMULATED_LOAD_FAILURE_CODE, SIMULATED_READY_DELAY_MS, SIMULATED_SHOW_DELAY_MS,
};
use mbk_application::lifecycle::ManagedAds;
use mbk_application::registry::{BACKENDS, BackendEntry, BackendEntryConfig, ProviderRegistryBuilder};
use mbk_domain::constants::KEY_SIMULATED;
use mbk_domain::error::Result;
use mbk_domain::ports::providers::BackendProvider;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Latencies and failure switches of the simulated backend
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSettings {
    /// Duration of the initialize call
    pub init_delay: Duration,
    /// Delay between initialize completing and the readiness flag flipping
    pub ready_delay: Duration,
    /// When set, initialize fails with this message
    pub fail_init: Option<String>,
    /// Ad load latency
    pub load_delay: Duration,
    /// Ad show latency, applied before the primary signal and again before close
    pub show_delay: Duration,
    /// When set, every ad load fails with this vendor code
    pub load_failure_code: Option<i32>,
    /// eCPM reported with each paid impression
    pub ecpm: f64,
}

impl Default for SimulatedSettings {
    fn default() -> Self {
        Self {
            init_delay: Duration::from_millis(SIMULATED_DEFAULT_INIT_DELAY_MS),
            ready_delay: Duration::from_millis(SIMULATED_DEFAULT_READY_DELAY_MS),
            fail_init: None,
            load_delay: Duration::from_millis(SIMULATED_DEFAULT_LOAD_DELAY_MS),
            show_delay: Duration::from_millis(SIMULATED_DEFAULT_SHOW_DELAY_MS),
            load_failure_code: None,
            ecpm: SIMULATED_DEFAULT_ECPM,
        }
    }
}

impl SimulatedSettings {
    /// Settings with every latency set to zero
    pub fn instant() -> Self {
        Self {
            init_delay: Duration::ZERO,
            ready_delay: Duration::ZERO,
            load_delay: Duration::ZERO,
            show_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Read settings from a catalog entry config, defaulting absent values
    pub fn from_entry_config(config: &BackendEntryConfig) -> Result<Self> {
        let defaults = Self::default();
        let millis = |name: &str, default: Duration| -> Result<Duration> {
            Ok(config
                .extra_parsed::<u64>(name)?
                .map_or(default, Duration::from_millis))
        };
        Ok(Self {
            init_delay: millis(SIMULATED_INIT_DELAY_MS, defaults.init_delay)?,
            ready_delay: millis(SIMULATED_READY_DELAY_MS, defaults.ready_delay)?,
            fail_init: config
                .extra
                .get(SIMULATED_FAIL_INIT)
                .filter(|message| !message.is_empty())
                .cloned(),
            load_delay: millis(SIMULATED_LOAD_DELAY_MS, defaults.load_delay)?,
            show_delay: millis(SIMULATED_SHOW_DELAY_MS, defaults.show_delay)?,
            load_failure_code: config.extra_parsed::<i32>(SIMULATED_LOAD_FAILURE_CODE)?,
            ecpm: config
                .extra_parsed::<f64>(SIMULATED_ECPM)?
                .unwrap_or(defaults.ecpm),
        })
    }
}

fn register_simulated_backend(
    builder: &mut ProviderRegistryBuilder,
    config: &BackendEntryConfig,
) -> Result<()> {
    let settings = SimulatedSettings::from_entry_config(config)?;
    debug!(key = %config.key, ?settings, "Simulated backend settings");

    let key = config.key.clone();
    let provider = Arc::new(SimulatedProvider::new(key.clone(), &settings));
    let readiness = provider.readiness();

    builder
        .register_provider(key.clone(), provider)?
        .register_auth(key.clone(), Arc::new(SimulatedAuth::new(key.clone())))?
        .register_analytics(key.clone(), Arc::new(SimulatedAnalytics::new(key.clone())))?
        .register_data_store(key.clone(), Arc::new(SimulatedDataStore::new(key.clone())))?
        .register_offerwall(key.clone(), Arc::new(SimulatedOfferwall::new(key.clone())))?;

    if let Some(units) = &config.ads {
        let network = Arc::new(SimulatedAdNetwork::new(&settings));
        let ads = ManagedAds::new(key.clone(), readiness, network, units.clone())?;
        builder.register_ads(key, Arc::new(ads))?;
    }
    Ok(())
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(BACKENDS)]
static SIMULATED_BACKEND: BackendEntry = BackendEntry {
    key: KEY_SIMULATED,
    description: "In-process simulated backend with scripted latencies",
    register: register_simulated_backend,
};

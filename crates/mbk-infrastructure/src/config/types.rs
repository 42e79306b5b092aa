//! Configuration types

use crate::constants::{
    DEFAULT_BANNER_UNIT_ID, DEFAULT_ENABLED_BACKENDS, DEFAULT_INIT_TIMEOUT_SECS,
    DEFAULT_INTERSTITIAL_UNIT_ID, DEFAULT_LOG_LEVEL, DEFAULT_REWARDED_UNIT_ID,
};
use mbk_application::lifecycle::AdUnitSet;
use mbk_application::registry::BackendEntryConfig;
use mbk_domain::constants::{KEY_NONE, KEY_SIMULATED};
use mbk_domain::value_objects::{BannerPlacement, PrimarySignal, ProviderKey};
use mbk_providers::constants::{
    SIMULATED_DEFAULT_ECPM, SIMULATED_DEFAULT_INIT_DELAY_MS, SIMULATED_DEFAULT_LOAD_DELAY_MS,
    SIMULATED_DEFAULT_READY_DELAY_MS, SIMULATED_DEFAULT_SHOW_DELAY_MS, SIMULATED_ECPM,
    SIMULATED_FAIL_INIT, SIMULATED_INIT_DELAY_MS, SIMULATED_LOAD_DELAY_MS,
    SIMULATED_LOAD_FAILURE_CODE, SIMULATED_READY_DELAY_MS, SIMULATED_SHOW_DELAY_MS,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Backend selection and lifecycle configuration
    #[serde(default)]
    pub backends: BackendsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to a daily-rotated file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_owned(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Backend selection and lifecycle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendsConfig {
    /// Backend families to register, in order; the first is the default key
    pub enabled: Vec<String>,

    /// Key substituted when a requested key is not registered
    pub fallback_key: String,

    /// Replace duplicate registrations instead of rejecting them
    pub allow_overwrite: bool,

    /// Bound on provider initialization in seconds; 0 waits indefinitely
    pub init_timeout_secs: u64,

    /// Simulated backend latencies
    pub simulated: SimulatedConfig,

    /// Ad units handed to backends that provide advertising
    pub ads: AdUnitsConfig,

    /// Free-form settings per backend key
    pub extra: HashMap<String, HashMap<String, String>>,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_ENABLED_BACKENDS.iter().map(|&k| k.to_owned()).collect(),
            fallback_key: KEY_NONE.to_owned(),
            allow_overwrite: false,
            init_timeout_secs: DEFAULT_INIT_TIMEOUT_SECS,
            simulated: SimulatedConfig::default(),
            ads: AdUnitsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl BackendsConfig {
    /// Fallback key as a provider key
    pub fn fallback(&self) -> ProviderKey {
        ProviderKey::new(self.fallback_key.clone())
    }

    /// Initialization bound, `None` when disabled
    pub fn init_timeout(&self) -> Option<Duration> {
        (self.init_timeout_secs > 0).then(|| Duration::from_secs(self.init_timeout_secs))
    }

    /// Catalog entry configs for the enabled backends, in order
    pub fn entry_configs(&self) -> Vec<BackendEntryConfig> {
        let ads = self.ads.enabled.then(|| self.ads.unit_set());
        self.enabled
            .iter()
            .map(|name| {
                let mut entry = BackendEntryConfig::new(name.as_str());
                entry.ads.clone_from(&ads);
                if name == KEY_SIMULATED {
                    entry.extra.extend(self.simulated.to_extra());
                }
                if let Some(extra) = self.extra.get(name) {
                    entry
                        .extra
                        .extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                entry
            })
            .collect()
    }
}

/// Simulated backend latencies and failure switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedConfig {
    /// Duration of the initialize call
    pub init_delay_ms: u64,
    /// Delay between initialize and readiness
    pub ready_delay_ms: u64,
    /// When set, initialize fails with this message
    pub fail_init: Option<String>,
    /// Ad load latency
    pub load_delay_ms: u64,
    /// Ad show latency
    pub show_delay_ms: u64,
    /// When set, every ad load fails with this vendor code
    pub load_failure_code: Option<i32>,
    /// eCPM reported on paid impressions
    pub ecpm: f64,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            init_delay_ms: SIMULATED_DEFAULT_INIT_DELAY_MS,
            ready_delay_ms: SIMULATED_DEFAULT_READY_DELAY_MS,
            fail_init: None,
            load_delay_ms: SIMULATED_DEFAULT_LOAD_DELAY_MS,
            show_delay_ms: SIMULATED_DEFAULT_SHOW_DELAY_MS,
            load_failure_code: None,
            ecpm: SIMULATED_DEFAULT_ECPM,
        }
    }
}

impl SimulatedConfig {
    /// Render as catalog extra settings
    pub fn to_extra(&self) -> HashMap<String, String> {
        let mut extra = HashMap::from([
            (SIMULATED_INIT_DELAY_MS.to_owned(), self.init_delay_ms.to_string()),
            (SIMULATED_READY_DELAY_MS.to_owned(), self.ready_delay_ms.to_string()),
            (SIMULATED_LOAD_DELAY_MS.to_owned(), self.load_delay_ms.to_string()),
            (SIMULATED_SHOW_DELAY_MS.to_owned(), self.show_delay_ms.to_string()),
            (SIMULATED_ECPM.to_owned(), self.ecpm.to_string()),
        ]);
        if let Some(message) = &self.fail_init {
            extra.insert(SIMULATED_FAIL_INIT.to_owned(), message.clone());
        }
        if let Some(code) = self.load_failure_code {
            extra.insert(SIMULATED_LOAD_FAILURE_CODE.to_owned(), code.to_string());
        }
        extra
    }
}

/// Ad unit identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdUnitsConfig {
    /// Hand ad units to backends at all
    pub enabled: bool,
    /// Banner unit id
    pub banner_id: String,
    /// Interstitial unit id
    pub interstitial_id: String,
    /// Rewarded unit id
    pub rewarded_id: String,
    /// Banner placement
    pub banner_placement: BannerPlacement,
    /// Interstitial completion signal joined with "closed"
    pub interstitial_signal: PrimarySignal,
    /// Rewarded completion signal joined with "closed"
    pub rewarded_signal: PrimarySignal,
}

impl Default for AdUnitsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            banner_id: DEFAULT_BANNER_UNIT_ID.to_owned(),
            interstitial_id: DEFAULT_INTERSTITIAL_UNIT_ID.to_owned(),
            rewarded_id: DEFAULT_REWARDED_UNIT_ID.to_owned(),
            banner_placement: BannerPlacement::default(),
            interstitial_signal: PrimarySignal::default(),
            rewarded_signal: PrimarySignal::default(),
        }
    }
}

impl AdUnitsConfig {
    /// Build the unit specs
    pub fn unit_set(&self) -> AdUnitSet {
        let mut units = AdUnitSet::new(
            self.banner_id.clone(),
            self.interstitial_id.clone(),
            self.rewarded_id.clone(),
        );
        units.banner = units.banner.with_placement(self.banner_placement);
        units.interstitial = units
            .interstitial
            .with_primary_signal(self.interstitial_signal);
        units.rewarded = units.rewarded.with_primary_signal(self.rewarded_signal);
        units
    }
}

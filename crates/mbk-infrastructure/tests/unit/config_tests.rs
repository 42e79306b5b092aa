//! Configuration loader and type tests

use mbk_domain::error::Error;
use mbk_domain::value_objects::PrimarySignal;
use mbk_infrastructure::config::loader::validate_app_config;
use mbk_infrastructure::config::{
    AppConfig, BackendsConfig, ConfigBuilder, ConfigLoader, SimulatedConfig,
};
use mbk_infrastructure::constants::{DEFAULT_INIT_TIMEOUT_SECS, DEFAULT_LOG_LEVEL};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert_eq!(config.backends.enabled, vec!["SIMULATED", "NONE"]);
    assert_eq!(config.backends.fallback_key, "NONE");
    assert!(!config.backends.allow_overwrite);
    assert_eq!(
        config.backends.init_timeout(),
        Some(Duration::from_secs(DEFAULT_INIT_TIMEOUT_SECS))
    );
    assert!(validate_app_config(&config).is_ok());
}

#[test]
fn test_zero_timeout_disables_bound() {
    let backends = BackendsConfig {
        init_timeout_secs: 0,
        ..BackendsConfig::default()
    };
    assert_eq!(backends.init_timeout(), None);
}

#[test]
fn test_entry_configs_follow_enabled_order() {
    let mut backends = BackendsConfig {
        enabled: vec!["NONE".to_owned(), "SIMULATED".to_owned()],
        ..BackendsConfig::default()
    };
    backends.simulated.load_failure_code = Some(3);
    backends
        .extra
        .entry("NONE".to_owned())
        .or_default()
        .insert("region".to_owned(), "eu".to_owned());

    let entries = backends.entry_configs();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].key.as_str(), "NONE");
    assert_eq!(entries[0].extra.get("region").map(String::as_str), Some("eu"));
    assert!(!entries[0].extra.contains_key("init_delay_ms"));
    assert_eq!(entries[1].key.as_str(), "SIMULATED");
    assert_eq!(
        entries[1].extra.get("load_failure_code").map(String::as_str),
        Some("3")
    );
    assert!(entries.iter().all(|entry| entry.ads.is_some()));
}

#[test]
fn test_entry_configs_without_ads() {
    let mut backends = BackendsConfig::default();
    backends.ads.enabled = false;

    assert!(backends.entry_configs().iter().all(|entry| entry.ads.is_none()));
}

#[test]
fn test_ad_unit_signals_are_applied() {
    let mut backends = BackendsConfig::default();
    backends.ads.interstitial_signal = PrimarySignal::Shown;

    let units = backends.ads.unit_set();

    assert_eq!(units.interstitial.primary_signal, PrimarySignal::Shown);
    assert_eq!(units.rewarded.primary_signal, PrimarySignal::Paid);
    assert_eq!(units.rewarded.unit_id, backends.ads.rewarded_id);
}

#[test]
fn test_validation_rejects_duplicate_backends() {
    let config = ConfigBuilder::new()
        .with_enabled_backends(["NONE", "SIMULATED", "NONE"])
        .build();

    let err = validate_app_config(&config).unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("'NONE'"));
}

#[test]
fn test_validation_rejects_empty_unit_id() {
    let mut config = AppConfig::default();
    config.backends.ads.rewarded_id = "  ".to_owned();

    let err = validate_app_config(&config).unwrap_err();

    assert!(err.to_string().contains("rewarded"));
}

#[test]
fn test_validation_ignores_unit_ids_when_ads_disabled() {
    let mut config = AppConfig::default();
    config.backends.ads.enabled = false;
    config.backends.ads.banner_id = String::new();

    assert!(validate_app_config(&config).is_ok());
}

#[test]
fn test_validation_rejects_unknown_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "loud".to_owned();

    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_validation_rejects_negative_ecpm() {
    let mut config = AppConfig::default();
    config.backends.simulated = SimulatedConfig {
        ecpm: -1.0,
        ..SimulatedConfig::default()
    };

    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_save_then_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("mbk.toml");
    let mut original = ConfigBuilder::new()
        .with_enabled_backends(["NONE"])
        .build();
    original.backends.fallback_key = "NONE".to_owned();
    original.backends.simulated.init_delay_ms = 7;

    let loader = ConfigLoader::new().with_config_path(&config_path);
    loader.save_to_file(&original, &config_path).unwrap();
    let loaded = loader.load().unwrap();

    assert_eq!(loaded.backends.enabled, vec!["NONE"]);
    assert_eq!(loaded.backends.simulated.init_delay_ms, 7);
    assert_eq!(loader.config_path(), Some(config_path.as_path()));
}

#[test]
fn test_partial_file_keeps_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("partial.toml");
    std::fs::write(
        &config_path,
        "[backends]\nfallback_key = \"SIMULATED\"\n\n[backends.simulated]\necpm = 1200.0\n",
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap();

    assert_eq!(config.backends.fallback_key, "SIMULATED");
    assert!((config.backends.simulated.ecpm - 1200.0).abs() < f64::EPSILON);
    assert_eq!(config.backends.enabled, vec!["SIMULATED", "NONE"]);
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();

    let config = ConfigLoader::new()
        .with_config_path(temp_dir.path().join("absent.toml"))
        .load()
        .unwrap();

    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_invalid_file_is_a_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    std::fs::write(&config_path, "[backends]\ninit_timeout_secs = \"soon\"\n").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }), "{err}");
}

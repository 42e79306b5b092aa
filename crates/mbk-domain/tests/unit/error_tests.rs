//! Unit tests for domain error types

use mbk_domain::Error;
use mbk_domain::value_objects::{CapabilityKind, ProviderKey};
use std::time::Duration;

#[test]
fn test_duplicate_key_error() {
    let error = Error::duplicate_key(CapabilityKind::Auth, ProviderKey::firebase());
    match &error {
        Error::DuplicateKey { kind, key } => {
            assert_eq!(*kind, CapabilityKind::Auth);
            assert_eq!(key.as_str(), "FIREBASE");
        }
        _ => panic!("Expected DuplicateKey error"),
    }
    assert_eq!(
        error.to_string(),
        "Duplicate registration: auth implementation already registered under 'FIREBASE'"
    );
}

#[test]
fn test_not_found_error() {
    let error = Error::not_found("auth implementation 'ADX'");
    match error {
        Error::NotFound { resource } => assert_eq!(resource, "auth implementation 'ADX'"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_no_implementation_names_kind() {
    let error = Error::no_implementation(CapabilityKind::Ads, "requested 'ADX', fallback 'NONE'");
    let display = error.to_string();
    assert!(display.starts_with("No ads implementation available"));
    assert!(display.contains("fallback 'NONE'"));
}

#[test]
fn test_load_failed_carries_code() {
    let error = Error::load_failed("reward-1", 3);
    match &error {
        Error::LoadFailed { unit_id, code } => {
            assert_eq!(unit_id, "reward-1");
            assert_eq!(*code, 3);
        }
        _ => panic!("Expected LoadFailed error"),
    }
    assert!(error.to_string().contains("code 3"));
}

#[test]
fn test_cancelled_is_detectable() {
    assert!(Error::cancelled("load").is_cancelled());
    assert!(!Error::internal("load").is_cancelled());
}

#[test]
fn test_timeout_reports_milliseconds() {
    let error = Error::timeout("provider initialization", Duration::from_secs(5));
    match &error {
        Error::Timeout { elapsed_ms, .. } => assert_eq!(*elapsed_ms, 5_000),
        _ => panic!("Expected Timeout error"),
    }
    assert_eq!(
        error.to_string(),
        "Operation timed out after 5000ms: provider initialization"
    );
}

#[test]
fn test_config_error_keeps_source() {
    let source = std::io::Error::new(std::io::ErrorKind::NotFound, "mbk.toml");
    let error = Error::config_with_source("cannot read config", source);

    let chained = std::error::Error::source(&error).map(ToString::to_string);
    assert_eq!(chained.as_deref(), Some("mbk.toml"));
}

#[test]
fn test_json_error_conversion() {
    let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: Error = parse.into();
    assert!(matches!(error, Error::Json { .. }));
}

//! Tests for the NONE fallback backend

use mbk_application::registry::{BackendEntryConfig, ProviderRegistry, find_backend};
use mbk_domain::ports::providers::{
    BackendAuth, BackendDataStore, BackendOfferwall, BackendProvider,
};
use mbk_domain::value_objects::{CapabilityKind, ProviderKey};
use mbk_providers::{NullAuth, NullDataStore, NullOfferwall, NullProvider};
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_null_provider_is_ready_before_initialize() {
    let provider = NullProvider::new(ProviderKey::none());

    assert!(provider.is_ready());
    provider.initialize(CancellationToken::new()).await.unwrap();
    assert!(provider.is_ready());
    assert_eq!(provider.name(), "null");
}

#[tokio::test]
async fn test_null_auth_declines_every_sign_in() {
    let auth = NullAuth::new(ProviderKey::none());

    assert!(!auth.sign_in_anonymously().await.unwrap());
    assert!(!auth.sign_in_with_email("a@b.c", "secret").await.unwrap());
    assert!(!auth.sign_in_with_platform("token").await.unwrap());
    assert!(!auth.is_signed_in());
    assert_eq!(auth.user_id(), None);
    assert!(!auth.auth_state().borrow().signed_in);
}

#[tokio::test]
async fn test_null_data_store_discards_writes() {
    let store = NullDataStore::new(ProviderKey::none());

    store.save("players", "u1", json!({"level": 3})).await.unwrap();

    assert_eq!(store.load("players", "u1").await.unwrap(), None);
    assert!(!store.delete("players", "u1").await.unwrap());
}

#[tokio::test]
async fn test_null_offerwall_reports_failure_code() {
    let offerwall = NullOfferwall::new(ProviderKey::none());

    offerwall.start_offerwall("u1").unwrap();
    let participation = offerwall.rewards("u1").await.unwrap();

    assert_eq!(participation.code, -1);
    assert!(!participation.is_success());
}

#[tokio::test]
async fn test_null_backend_registers_everything_but_ads() {
    let entry = find_backend("NONE").unwrap();
    let mut builder = ProviderRegistry::builder();

    (entry.register)(&mut builder, &BackendEntryConfig::new(ProviderKey::none())).unwrap();
    let registry = builder.build();

    let key = ProviderKey::none();
    for kind in [
        CapabilityKind::Provider,
        CapabilityKind::Auth,
        CapabilityKind::Analytics,
        CapabilityKind::DataStore,
        CapabilityKind::Offerwall,
    ] {
        assert!(registry.contains(kind, &key), "NONE should provide {kind}");
    }
    assert!(!registry.contains(CapabilityKind::Ads, &key));
}

#[tokio::test]
async fn test_null_backend_under_custom_key() {
    let entry = find_backend("NONE").unwrap();
    let mut builder = ProviderRegistry::builder();

    (entry.register)(&mut builder, &BackendEntryConfig::new("OFFLINE")).unwrap();
    let registry = builder.build();

    let provider = registry
        .get::<dyn BackendProvider>(&ProviderKey::from("OFFLINE"))
        .unwrap();
    assert_eq!(provider.provider_key().as_str(), "OFFLINE");
}

//! Unit tests for value objects

use mbk_domain::value_objects::{
    AdFormat, AdRevenue, AdUnitSpec, AnalyticsParameter, AuthState, BannerSize, CapabilityKind,
    InitState, Participation, PrimarySignal, ProviderKey, ResourceClass, ResourceState,
};

#[test]
fn test_provider_keys_compare_verbatim() {
    assert_ne!(ProviderKey::from("adx"), ProviderKey::adx());
    assert_eq!(ProviderKey::from("ADX"), ProviderKey::adx());
    assert!(ProviderKey::none().is_none());
    assert!(!ProviderKey::simulated().is_none());
}

#[test]
fn test_provider_key_serializes_as_string() {
    let json = serde_json::to_string(&ProviderKey::pointpub()).unwrap();
    assert_eq!(json, "\"POINTPUB\"");
    let key: ProviderKey = serde_json::from_str("\"FIREBASE\"").unwrap();
    assert_eq!(key, ProviderKey::firebase());
}

#[test]
fn test_capability_kind_names() {
    let names: Vec<&str> = CapabilityKind::ALL.iter().map(CapabilityKind::as_str).collect();
    assert_eq!(
        names,
        vec!["provider", "auth", "analytics", "data_store", "ads", "offerwall"]
    );
}

#[test]
fn test_formats_map_to_resource_classes() {
    assert_eq!(AdFormat::Banner.resource_class(), ResourceClass::Persistent);
    assert_eq!(AdFormat::Interstitial.resource_class(), ResourceClass::Consumable);
    assert_eq!(AdFormat::Rewarded.resource_class(), ResourceClass::Consumable);
}

#[test]
fn test_ad_unit_spec_defaults() {
    let spec = AdUnitSpec::rewarded("reward-1");
    assert_eq!(spec.unit_id, "reward-1");
    assert_eq!(spec.primary_signal, PrimarySignal::Paid);
    assert_eq!(spec.placement.size, BannerSize::Standard);

    let spec = AdUnitSpec::interstitial("inter-1").with_primary_signal(PrimarySignal::Shown);
    assert_eq!(spec.primary_signal, PrimarySignal::Shown);
    assert_eq!(spec.resource_class(), ResourceClass::Consumable);
}

#[test]
fn test_banner_dimensions() {
    assert_eq!(BannerSize::Standard.dimensions(), (320, 50));
    assert_eq!(BannerSize::MediumRectangle.dimensions(), (300, 250));
}

#[test]
fn test_revenue_divides_ecpm() {
    let revenue = AdRevenue::from_ecpm("reward-1", 2_500.0);
    assert!((revenue.amount - 2.5).abs() < f64::EPSILON);
}

#[test]
fn test_lifecycle_defaults() {
    assert_eq!(InitState::default(), InitState::NotStarted);
    assert_eq!(ResourceState::default(), ResourceState::Idle);
    assert!(ResourceState::Loading.is_loading());
    assert!(!ResourceState::Loaded.is_loading());
}

#[test]
fn test_auth_state_constructors() {
    let state = AuthState::signed_in("u1");
    assert!(state.signed_in);
    assert_eq!(state.user_id.as_deref(), Some("u1"));
    assert_eq!(AuthState::signed_out(), AuthState::default());
}

#[test]
fn test_analytics_parameter_accepts_json_values() {
    let level = AnalyticsParameter::new("level", 7);
    let name = AnalyticsParameter::new("name", "forest");
    assert_eq!(level.value, serde_json::json!(7));
    assert_eq!(name.value, serde_json::json!("forest"));
}

#[test]
fn test_participation_success_follows_code_sign() {
    assert!(Participation::new(0, "{}").is_success());
    assert!(!Participation::new(-1, "unavailable").is_success());
}

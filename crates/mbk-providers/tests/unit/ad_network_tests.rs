//! Tests for the simulated ad network and the simulated Ads capability

use mbk_application::lifecycle::AdUnitSet;
use mbk_application::registry::{BackendEntryConfig, ProviderRegistry, register_backends};
use mbk_domain::events::BackendEvent;
use mbk_domain::ports::providers::{BackendAds, BackendProvider};
use mbk_domain::ports::vendor::{AdEventSink, AdNetwork, TaggedAdEvent, VendorAdEvent};
use mbk_domain::value_objects::{AdUnitSpec, CapabilityKind, ProviderKey};
use mbk_providers::{SimulatedAdNetwork, SimulatedSettings};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

fn unit_channel() -> (AdEventSink, mpsc::UnboundedReceiver<TaggedAdEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (AdEventSink::new(1, tx), rx)
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<TaggedAdEvent>) -> Option<VendorAdEvent> {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .ok()
        .flatten()
        .map(|tagged| tagged.event)
}

// ============================================================================
// Vendor primitives
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_consumable_unit_load_then_show_cycle() {
    let network = SimulatedAdNetwork::new(&SimulatedSettings::default());
    let (sink, mut rx) = unit_channel();
    let unit = network.create_unit(&AdUnitSpec::rewarded("rw"), sink);

    unit.load();
    assert_eq!(next_event(&mut rx).await, Some(VendorAdEvent::Loaded));
    assert!(unit.is_loaded());

    unit.show();
    assert_eq!(next_event(&mut rx).await, Some(VendorAdEvent::Shown));
    assert_eq!(next_event(&mut rx).await, Some(VendorAdEvent::Paid(4_000.0)));
    assert_eq!(next_event(&mut rx).await, Some(VendorAdEvent::Closed));
    assert!(!unit.is_loaded());

    assert_eq!(network.units_created(), 1);
    assert_eq!(network.loads_requested(), 1);
    assert_eq!(network.shows_requested(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_show_without_load_fails_to_show() {
    let network = SimulatedAdNetwork::new(&SimulatedSettings::instant());
    let (sink, mut rx) = unit_channel();
    let unit = network.create_unit(&AdUnitSpec::interstitial("it"), sink);

    unit.show();

    assert_eq!(next_event(&mut rx).await, Some(VendorAdEvent::FailedToShow));
}

#[tokio::test(start_paused = true)]
async fn test_configured_load_failure_code() {
    let settings = SimulatedSettings {
        load_failure_code: Some(3),
        ..SimulatedSettings::instant()
    };
    let network = SimulatedAdNetwork::new(&settings);
    let (sink, mut rx) = unit_channel();
    let unit = network.create_unit(&AdUnitSpec::rewarded("rw"), sink);

    unit.load();

    assert_eq!(next_event(&mut rx).await, Some(VendorAdEvent::LoadFailed(3)));
    assert!(!unit.is_loaded());
}

#[tokio::test(start_paused = true)]
async fn test_destroy_silences_scheduled_events() {
    let network = SimulatedAdNetwork::new(&SimulatedSettings::default());
    let (sink, mut rx) = unit_channel();
    let unit = network.create_unit(&AdUnitSpec::banner("bn"), sink);

    unit.load();
    unit.destroy();

    assert_eq!(next_event(&mut rx).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_banner_show_never_closes() {
    let network = SimulatedAdNetwork::new(&SimulatedSettings::instant());
    let (sink, mut rx) = unit_channel();
    let unit = network.create_unit(&AdUnitSpec::banner("bn"), sink);

    unit.load();
    assert_eq!(next_event(&mut rx).await, Some(VendorAdEvent::Loaded));
    unit.show();
    assert_eq!(next_event(&mut rx).await, Some(VendorAdEvent::Shown));
    assert!(matches!(next_event(&mut rx).await, Some(VendorAdEvent::Paid(_))));

    assert_eq!(next_event(&mut rx).await, None);
    assert!(unit.is_loaded());
}

// ============================================================================
// Simulated Ads capability through the catalog
// ============================================================================

fn simulated_registry() -> ProviderRegistry {
    let config = BackendEntryConfig::new(ProviderKey::simulated())
        .with_ads(AdUnitSet::new("banner-1", "inter-1", "reward-1"))
        .with_extra("init_delay_ms", "10")
        .with_extra("ready_delay_ms", "20");
    let mut builder = ProviderRegistry::builder();
    register_backends(&mut builder, &[config]).unwrap();
    builder.build()
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn test_ads_registered_only_with_units() {
    let mut builder = ProviderRegistry::builder();
    register_backends(&mut builder, &[BackendEntryConfig::new(ProviderKey::simulated())]).unwrap();

    let registry = builder.build();

    assert!(registry.contains(CapabilityKind::DataStore, &ProviderKey::simulated()));
    assert!(!registry.contains(CapabilityKind::Ads, &ProviderKey::simulated()));
}

#[tokio::test(start_paused = true)]
async fn test_simulated_ads_preload_and_rewarded_cycle() {
    let registry = simulated_registry();
    let key = ProviderKey::simulated();
    let provider = registry.get::<dyn BackendProvider>(&key).unwrap();
    let ads = registry.get::<dyn BackendAds>(&key).unwrap();
    let mut events = ads.subscribe();

    provider.initialize(CancellationToken::new()).await.unwrap();
    wait_until(|| ads.is_rewarded_ready() && ads.is_interstitial_ready()).await;

    let (rewarded_tx, rewarded_rx) = oneshot::channel();
    ads.show_rewarded(
        Box::new(move || {
            let _ = rewarded_tx.send(());
        }),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    tokio::time::timeout(Duration::from_secs(5), rewarded_rx)
        .await
        .expect("reward callback not invoked")
        .unwrap();

    let mut revenue = None;
    while let Ok(event) = events.try_recv() {
        if let BackendEvent::AdRevenue { unit_id, amount } = event
            && unit_id == "reward-1"
        {
            revenue = Some(amount);
        }
    }
    assert_eq!(revenue, Some(4.0));

    // consumed units reload on their own
    wait_until(|| ads.is_rewarded_ready()).await;
}

#[tokio::test(start_paused = true)]
async fn test_simulated_ads_skip_load_before_ready() {
    let registry = simulated_registry();
    let ads = registry
        .get::<dyn BackendAds>(&ProviderKey::simulated())
        .unwrap();
    let mut events = ads.subscribe();

    let outcome = ads.load_interstitial(CancellationToken::new()).await.unwrap();

    assert_eq!(outcome, mbk_domain::value_objects::LoadOutcome::Skipped);
    assert!(events.try_recv().unwrap().is_error());
}

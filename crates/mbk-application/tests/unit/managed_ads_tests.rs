//! Tests for the managed ads capability

use crate::support::{LoadReply, ScriptedNetwork, TestProvider, settle};
use futures::{FutureExt, StreamExt};
use mbk_application::lifecycle::{AdUnitSet, ManagedAds};
use mbk_domain::events::BackendEvent;
use mbk_domain::ports::providers::{BackendAds, BackendProvider};
use mbk_domain::value_objects::{ProviderKey, ResourceState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

fn managed(network: &ScriptedNetwork, provider: &TestProvider) -> ManagedAds {
    ManagedAds::new(
        ProviderKey::from("TEST"),
        provider.readiness(),
        Arc::new(network.clone()),
        AdUnitSet::new("bn-1", "is-1", "rw-1"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_units_preload_once_provider_is_ready() {
    let network = ScriptedNetwork::new(LoadReply::Loaded);
    let provider = TestProvider::new("TEST");
    let ads = managed(&network, &provider);

    settle().await;
    assert_eq!(network.created(), 0);

    provider.flag().set_ready();
    settle().await;

    assert_eq!(network.created(), 3);
    assert!(ads.is_interstitial_ready());
    assert!(ads.is_rewarded_ready());
    assert_eq!(ads.banner().state(), ResourceState::Loaded);
}

#[tokio::test]
async fn test_show_rewarded_through_capability() {
    let network = ScriptedNetwork::new(LoadReply::Loaded);
    let provider = TestProvider::ready("TEST");
    let ads = managed(&network, &provider);
    settle().await;
    let mut events = ads.event_stream();
    let rewarded = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&rewarded);

    ads.show_rewarded(
        Box::new(move || flag.store(true, Ordering::SeqCst)),
        CancellationToken::new(),
    )
    .await
    .unwrap();
    // preload created banner, interstitial, rewarded in that order
    let sink = network.sink_at(2);
    sink.paid(4000.0);
    sink.closed();
    settle().await;

    assert!(rewarded.load(Ordering::SeqCst));
    let mut saw_revenue = false;
    while let Some(Some(event)) = events.next().now_or_never() {
        if let BackendEvent::AdRevenue { unit_id, amount } = event {
            assert_eq!(unit_id, "rw-1");
            assert!((amount - 4.0).abs() < f64::EPSILON);
            saw_revenue = true;
        }
    }
    assert!(saw_revenue);
}

#[tokio::test]
async fn test_banner_show_and_hide_through_capability() {
    let network = ScriptedNetwork::new(LoadReply::Loaded);
    let provider = TestProvider::ready("TEST");
    let ads = managed(&network, &provider);
    settle().await;

    ads.show_banner(CancellationToken::new()).await.unwrap();
    assert_eq!(ads.banner().state(), ResourceState::Showing);

    ads.hide_banner();
    assert_eq!(ads.banner().state(), ResourceState::Idle);
}

#[tokio::test]
async fn test_dispose_disposes_every_controller() {
    let network = ScriptedNetwork::new(LoadReply::Loaded);
    let provider = TestProvider::ready("TEST");
    let ads = managed(&network, &provider);
    settle().await;
    assert_eq!(network.created(), 3);

    ads.dispose();
    ads.dispose();

    for controller in ads.controllers() {
        assert!(controller.is_disposed());
    }
    assert_eq!(network.destroyed(), 3);
}

#[tokio::test]
async fn test_load_all_skips_units_while_provider_not_ready() {
    let network = ScriptedNetwork::new(LoadReply::Loaded);
    let provider = TestProvider::new("TEST");
    let ads = managed(&network, &provider);
    let mut rx = ads.subscribe();

    ads.load_all(CancellationToken::new()).await.unwrap();

    assert_eq!(network.created(), 0);
    let errors = std::iter::from_fn(|| rx.try_recv().ok())
        .filter(BackendEvent::is_error)
        .count();
    assert_eq!(errors, 3);
}

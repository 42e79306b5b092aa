//! Composition root tests

use async_trait::async_trait;
use mbk_application::services::PostInitHook;
use mbk_domain::error::{Error, Result};
use mbk_domain::events::BackendEvent;
use mbk_domain::value_objects::{CapabilityKind, InitState, ProviderKey, ResourceState};
use mbk_infrastructure::config::{AppConfig, ConfigBuilder, SimulatedConfig};
use mbk_infrastructure::{build_registry, init_backends, init_backends_with_hook};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use tokio_util::sync::CancellationToken;

fn fast_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.backends.simulated = SimulatedConfig {
        init_delay_ms: 10,
        ready_delay_ms: 20,
        load_delay_ms: 5,
        show_delay_ms: 5,
        ..SimulatedConfig::default()
    };
    config
}

async fn wait_for_event(
    events: &mut broadcast::Receiver<BackendEvent>,
    mut matches: impl FnMut(&BackendEvent) -> bool,
) -> BackendEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Ok(event) if matches(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("event not published")
}

#[derive(Default)]
struct CountingHook {
    calls: AtomicUsize,
}

#[async_trait]
impl PostInitHook for CountingHook {
    async fn after_all_initialized(&self, _cancel: CancellationToken) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_build_registry_registers_enabled_backends() {
    let registry = build_registry(&AppConfig::default()).unwrap();

    assert_eq!(
        registry.default_key(CapabilityKind::Provider),
        Some(ProviderKey::simulated())
    );
    assert!(registry.contains(CapabilityKind::Ads, &ProviderKey::simulated()));
    assert!(!registry.contains(CapabilityKind::Ads, &ProviderKey::none()));
    assert!(registry.contains(CapabilityKind::Offerwall, &ProviderKey::none()));
}

#[test]
fn test_build_registry_without_ads() {
    let mut config = AppConfig::default();
    config.backends.ads.enabled = false;

    let registry = build_registry(&config).unwrap();

    assert!(registry.keys_for(CapabilityKind::Ads).is_empty());
}

#[test]
fn test_build_registry_with_ads_outside_runtime_is_an_error() {
    let err = build_registry(&AppConfig::default()).unwrap_err();

    assert!(matches!(err, Error::Internal { .. }), "{err}");
    assert!(err.to_string().contains("runtime"));
}

#[tokio::test]
async fn test_build_registry_unknown_backend() {
    let config = ConfigBuilder::new()
        .with_enabled_backends(["SIMULATED", "PLAYFAB"])
        .build();

    let err = build_registry(&config).unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }), "{err}");
    assert!(err.to_string().contains("PLAYFAB"));
}

#[tokio::test(start_paused = true)]
async fn test_context_selects_with_configured_fallback() {
    let context = init_backends(fast_config()).await.unwrap();
    let service = context.service();

    let auth = service.auth(None).unwrap();
    assert_eq!(auth.provider_key(), &ProviderKey::simulated());

    let fallback = service.auth(Some(&ProviderKey::adx())).unwrap();
    assert_eq!(fallback.provider_key(), &ProviderKey::none());

    // NONE provides no ads, so an unknown key has nowhere to fall back to
    assert!(service.ads(Some(&ProviderKey::adx())).is_err());
    assert!(service.ads(None).is_ok());

    assert!(context.shutdown().await);
}

#[tokio::test(start_paused = true)]
async fn test_start_initializes_every_provider_and_runs_hook_once() {
    let hook = Arc::new(CountingHook::default());
    let context = init_backends_with_hook(fast_config(), hook.clone())
        .await
        .unwrap();
    let mut events = context.events().subscribe();

    context.start().await.unwrap();
    context.start().await.unwrap();

    let initializer = context.initializer();
    assert!(initializer.is_all_ready());
    assert_eq!(initializer.provider_count(), 2);
    assert_eq!(initializer.state_of(&ProviderKey::simulated()), InitState::Ready);
    assert_eq!(initializer.state_of(&ProviderKey::none()), InitState::Ready);
    assert_eq!(hook.calls.load(Ordering::SeqCst), 1);

    let ready = wait_for_event(&mut events, |event| {
        matches!(event, BackendEvent::AllProvidersReady { .. })
    })
    .await;
    assert!(matches!(
        ready,
        BackendEvent::AllProvidersReady { provider_count: 2 }
    ));

    assert!(context.shutdown().await);
}

#[tokio::test(start_paused = true)]
async fn test_start_surfaces_provider_failure() {
    let mut config = fast_config();
    config.backends.simulated.fail_init = Some("console offline".to_owned());
    let context = init_backends(config).await.unwrap();

    let err = context.start().await.unwrap_err();

    assert!(err.to_string().contains("console offline"), "{err}");
    assert_eq!(
        context.initializer().state_of(&ProviderKey::simulated()),
        InitState::Failed
    );
    assert!(context.shutdown().await);
}

#[tokio::test(start_paused = true)]
async fn test_ads_events_reach_the_shared_bus() {
    let context = init_backends(fast_config()).await.unwrap();
    let mut events = context.events().subscribe();
    context.start().await.unwrap();

    let rewarded_id = context.config().backends.ads.rewarded_id.clone();
    wait_for_event(&mut events, |event| {
        matches!(
            event,
            BackendEvent::AdStateChanged { unit_id, state: ResourceState::Loaded }
                if *unit_id == rewarded_id
        )
    })
    .await;

    let ads = context.service().ads(None).unwrap();
    let (tx, rx) = oneshot::channel();
    ads.show_rewarded(
        Box::new(move || {
            let _ = tx.send(());
        }),
        CancellationToken::new(),
    )
    .await
    .unwrap();
    tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("reward callback not invoked")
        .unwrap();

    let revenue = wait_for_event(&mut events, |event| {
        matches!(event, BackendEvent::AdRevenue { .. })
    })
    .await;
    assert!(matches!(revenue, BackendEvent::AdRevenue { amount, .. } if (amount - 4.0).abs() < 1e-9));

    assert!(context.shutdown().await);
    assert!(context.shutdown_coordinator().is_shutting_down());
}

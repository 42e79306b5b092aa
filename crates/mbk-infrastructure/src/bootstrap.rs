//! Backend Bootstrap
//!
//! Composition root: turns [`AppConfig`] into a built registry, a selector
//! with the configured fallback key, a providers initializer and one event
//! bus that also carries every ads implementation's events.
//!
//! ```text
//! AppConfig → BackendEntryConfigs → BACKENDS (linkme) → ProviderRegistry
//!                                                        ├─ BackendService
//!                                                        └─ ProvidersInitializer
//! ```
//!
//! ```rust,ignore
//! let context = init_backends(ConfigLoader::new().load()?).await?;
//! context.start().await?;
//! let ads = context.service().ads(None)?;
//! ```

use crate::config::AppConfig;
use crate::constants::SHUTDOWN_TIMEOUT_SECS;
use crate::shutdown::ShutdownCoordinator;
use mbk_application::events::EventBus;
use mbk_application::registry::{ProviderRegistry, register_backends};
use mbk_application::services::{
    BackendSelector, BackendService, NoopPostInitHook, PostInitHook, ProvidersInitializer,
};
use mbk_domain::error::Result;
use mbk_domain::events::BackendEvent;
use mbk_domain::ports::providers::BackendAds;
use mbk_domain::value_objects::CapabilityKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Everything built from configuration
pub struct BackendContext {
    config: Arc<AppConfig>,
    registry: Arc<ProviderRegistry>,
    service: BackendService,
    initializer: Arc<ProvidersInitializer>,
    events: EventBus,
    shutdown: ShutdownCoordinator,
}

impl BackendContext {
    /// Loaded configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Built registry
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Capability accessors with fallback selection
    pub fn service(&self) -> &BackendService {
        &self.service
    }

    /// Providers initializer
    pub fn initializer(&self) -> &Arc<ProvidersInitializer> {
        &self.initializer
    }

    /// Bus carrying initializer and ads events
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Background task coordinator
    pub fn shutdown_coordinator(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Initialize every provider and wait for readiness
    ///
    /// Cancelled when [`BackendContext::shutdown`] begins.
    pub async fn start(&self) -> Result<()> {
        self.initializer.start(self.shutdown.child_token()).await
    }

    /// Stop background tasks; `true` if all finished in time
    pub async fn shutdown(&self) -> bool {
        self.initializer.shutdown().await;
        self.shutdown
            .shutdown(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS))
            .await
    }
}

impl std::fmt::Debug for BackendContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendContext")
            .field("registry", &self.registry)
            .field("fallback_key", self.service.selector().fallback_key())
            .field("initializer", &self.initializer)
            .finish_non_exhaustive()
    }
}

/// Register the enabled backends into a fresh registry
///
/// Backends that provide ads start their event pumps here, so this must run
/// inside a tokio runtime; outside one it fails with [`Error::Internal`].
///
/// [`Error::Internal`]: mbk_domain::error::Error::Internal
pub fn build_registry(config: &AppConfig) -> Result<ProviderRegistry> {
    let mut builder = ProviderRegistry::builder().allow_overwrite(config.backends.allow_overwrite);
    register_backends(&mut builder, &config.backends.entry_configs())?;
    Ok(builder.build())
}

/// Build the backend context with no post-initialization hook
pub async fn init_backends(config: AppConfig) -> Result<BackendContext> {
    init_backends_with_hook(config, Arc::new(NoopPostInitHook)).await
}

/// Build the backend context
///
/// `hook` runs once after every provider initialized and reported ready.
/// Providers are not initialized until [`BackendContext::start`].
pub async fn init_backends_with_hook(
    config: AppConfig,
    hook: Arc<dyn PostInitHook>,
) -> Result<BackendContext> {
    info!(
        enabled = ?config.backends.enabled,
        fallback = %config.backends.fallback_key,
        "Initializing backend context"
    );
    let config = Arc::new(config);
    let registry = Arc::new(build_registry(&config)?);
    debug!(registered = registry.len(), "Registry built");

    let service = BackendService::new(BackendSelector::new(
        Arc::clone(&registry),
        config.backends.fallback(),
    ));
    let events = EventBus::new();
    let initializer = Arc::new(
        ProvidersInitializer::from_registry(&registry, hook, events.clone())
            .with_init_timeout(config.backends.init_timeout()),
    );
    let shutdown = ShutdownCoordinator::new();

    for key in registry.keys_for(CapabilityKind::Ads) {
        let ads = registry.get::<dyn BackendAds>(&key)?;
        forward_ads_events(&shutdown, ads.subscribe(), events.clone());
    }

    Ok(BackendContext {
        config,
        registry,
        service,
        initializer,
        events,
        shutdown,
    })
}

fn forward_ads_events(
    shutdown: &ShutdownCoordinator,
    mut source: broadcast::Receiver<BackendEvent>,
    sink: EventBus,
) {
    shutdown.spawn_cancellable("ads-event-forward", |token| async move {
        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => break,
                received = source.recv() => match received {
                    Ok(event) => sink.publish(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Ads event forwarder lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    });
}

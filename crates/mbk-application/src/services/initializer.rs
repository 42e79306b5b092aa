//! Providers Initializer
//!
//! Starts every registered backend provider and signals when the whole set
//! is usable. Two barriers are involved:
//!
//! 1. every provider's `initialize` call completed (fan-out / fan-in)
//! 2. every provider's readiness flag is set (`AllReady`)
//!
//! A provider may finish `initialize` before it reports ready, for example
//! while a consent flow is pending, so the second barrier is awaited on its
//! own. Once both pass, the [`PostInitHook`] runs, exactly once for the
//! lifetime of the initializer.

use crate::events::EventBus;
use crate::registry::ProviderRegistry;
use async_trait::async_trait;
use dashmap::DashMap;
use futures::future::try_join_all;
use mbk_domain::error::{Error, Result};
use mbk_domain::events::BackendEvent;
use mbk_domain::ports::providers::BackendProvider;
use mbk_domain::value_objects::{InitState, ProviderKey};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

/// Work to run once all providers are initialized and ready
#[async_trait]
pub trait PostInitHook: Send + Sync {
    /// Called after both initialization barriers pass
    async fn after_all_initialized(&self, cancel: CancellationToken) -> Result<()>;
}

/// Hook that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPostInitHook;

#[async_trait]
impl PostInitHook for NoopPostInitHook {
    async fn after_all_initialized(&self, _cancel: CancellationToken) -> Result<()> {
        Ok(())
    }
}

/// Aggregate readiness over a fixed, ordered set of providers
///
/// Keeps one flag per provider plus a count of set flags, so each change is
/// O(1). `AllReady` is true when every flag is set, and trivially true for
/// an empty set.
#[derive(Debug)]
pub struct ReadinessTracker {
    flags: Mutex<ReadyFlags>,
    all_ready: watch::Sender<bool>,
}

#[derive(Debug)]
struct ReadyFlags {
    ready: Vec<bool>,
    ready_count: usize,
}

impl ReadinessTracker {
    /// Create a tracker seeded with each provider's current readiness
    pub fn new(initial: &[bool]) -> Self {
        let ready_count = initial.iter().filter(|ready| **ready).count();
        let (all_ready, _) = watch::channel(ready_count == initial.len());
        Self {
            flags: Mutex::new(ReadyFlags {
                ready: initial.to_vec(),
                ready_count,
            }),
            all_ready,
        }
    }

    /// Update one provider's flag; returns the resulting aggregate
    pub fn set(&self, index: usize, ready: bool) -> bool {
        let mut guard = self.flags.lock();
        let flags = &mut *guard;
        if let Some(slot) = flags.ready.get_mut(index)
            && *slot != ready
        {
            *slot = ready;
            if ready {
                flags.ready_count += 1;
            } else {
                flags.ready_count -= 1;
            }
        }
        let all = flags.ready_count == flags.ready.len();
        self.all_ready.send_if_modified(|current| {
            if *current == all {
                false
            } else {
                *current = all;
                true
            }
        });
        all
    }

    /// Whether every provider is ready
    pub fn is_all_ready(&self) -> bool {
        *self.all_ready.borrow()
    }

    /// Subscribe to the aggregate
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.all_ready.subscribe()
    }

    /// Number of tracked providers
    pub fn len(&self) -> usize {
        self.flags.lock().ready.len()
    }

    /// Whether no providers are tracked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Initialization orchestrator for the registered providers
pub struct ProvidersInitializer {
    providers: Vec<Arc<dyn BackendProvider>>,
    states: DashMap<ProviderKey, InitState>,
    readiness: Arc<ReadinessTracker>,
    hook: Arc<dyn PostInitHook>,
    hook_invoked: AtomicBool,
    start_lock: tokio::sync::Mutex<()>,
    mirroring: AtomicBool,
    mirror_tasks: TaskTracker,
    mirror_token: CancellationToken,
    events: EventBus,
    init_timeout: Option<Duration>,
}

impl ProvidersInitializer {
    /// Create an initializer over an ordered set of providers
    pub fn new(
        providers: Vec<Arc<dyn BackendProvider>>,
        hook: Arc<dyn PostInitHook>,
        events: EventBus,
    ) -> Self {
        let initial: Vec<bool> = providers.iter().map(|p| p.is_ready()).collect();
        let states = providers
            .iter()
            .map(|p| (p.provider_key().clone(), InitState::NotStarted))
            .collect();
        Self {
            providers,
            states,
            readiness: Arc::new(ReadinessTracker::new(&initial)),
            hook,
            hook_invoked: AtomicBool::new(false),
            start_lock: tokio::sync::Mutex::new(()),
            mirroring: AtomicBool::new(false),
            mirror_tasks: TaskTracker::new(),
            mirror_token: CancellationToken::new(),
            events,
            init_timeout: None,
        }
    }

    /// Create an initializer over every provider in a registry
    pub fn from_registry(
        registry: &ProviderRegistry,
        hook: Arc<dyn PostInitHook>,
        events: EventBus,
    ) -> Self {
        Self::new(registry.providers(), hook, events)
    }

    /// Bound the duration of the initialize and readiness barriers
    #[must_use]
    pub fn with_init_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.init_timeout = timeout;
        self
    }

    /// Run both barriers, then the post-init hook
    ///
    /// Concurrent calls are serialized. Cancellation abandons the current
    /// barrier and returns [`Error::Cancelled`] without running the hook.
    pub async fn start(&self, cancel: CancellationToken) -> Result<()> {
        let _serialized = self.start_lock.lock().await;
        self.ensure_mirroring();
        info!(providers = self.providers.len(), "Initializing providers");
        let started = Instant::now();

        let barriers = match self.init_timeout {
            Some(limit) => tokio::time::timeout(limit, self.run_barriers(&cancel))
                .await
                .unwrap_or_else(|_| {
                    error!(
                        timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                        "Provider initialization timed out"
                    );
                    Err(Error::timeout("provider initialization", limit))
                }),
            None => self.run_barriers(&cancel).await,
        };
        if let Err(e) = barriers {
            self.reset_interrupted();
            if e.is_cancelled() {
                info!("Provider initialization cancelled");
            }
            return Err(e);
        }

        info!(
            providers = self.providers.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "All providers initialized and ready"
        );
        self.events.publish(BackendEvent::AllProvidersReady {
            provider_count: self.providers.len(),
        });

        if self.hook_invoked.swap(true, Ordering::SeqCst) {
            debug!("Post-initialization hook already ran");
            return Ok(());
        }
        self.hook.after_all_initialized(cancel).await
    }

    async fn run_barriers(&self, cancel: &CancellationToken) -> Result<()> {
        self.initialize_all(cancel).await?;
        self.wait_all_ready(cancel).await
    }

    async fn initialize_all(&self, cancel: &CancellationToken) -> Result<()> {
        let fan_out = try_join_all(
            self.providers
                .iter()
                .map(|provider| self.initialize_one(provider, cancel.clone())),
        );
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::cancelled("provider initialization")),
            joined = fan_out => joined.map(|_| ()),
        }
    }

    async fn initialize_one(
        &self,
        provider: &Arc<dyn BackendProvider>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let key = provider.provider_key().clone();
        self.states.insert(key.clone(), InitState::Initializing);
        debug!(provider = %key, "Initializing provider");

        match provider.initialize(cancel).await {
            Ok(()) => {
                self.states.insert(key.clone(), InitState::Ready);
                info!(provider = %key, name = provider.name(), "Provider initialized");
                self.events
                    .publish(BackendEvent::ProviderInitialized { key });
                Ok(())
            }
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                self.states.insert(key.clone(), InitState::Failed);
                error!(provider = %key, error = %e, "Provider initialization failed");
                let message = e.to_string();
                self.events.publish(BackendEvent::InitializationFailed {
                    key: key.clone(),
                    message: message.clone(),
                });
                Err(Error::initialization(key, message))
            }
        }
    }

    async fn wait_all_ready(&self, cancel: &CancellationToken) -> Result<()> {
        let mut all_ready = self.readiness.subscribe();
        if !*all_ready.borrow() {
            debug!("Waiting for all providers to report ready");
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::cancelled("waiting for provider readiness")),
            changed = all_ready.wait_for(|ready| *ready) => changed
                .map(|_| ())
                .map_err(|_| Error::internal("readiness aggregate closed")),
        }
    }

    /// Providers whose initialize was abandoned go back to `NotStarted`
    fn reset_interrupted(&self) {
        for mut entry in self.states.iter_mut() {
            if *entry.value() == InitState::Initializing {
                *entry.value_mut() = InitState::NotStarted;
            }
        }
    }

    /// Spawn one task per provider that mirrors its readiness flag into the
    /// aggregate; a no-op outside a tokio runtime or once started
    fn ensure_mirroring(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        if self.mirroring.swap(true, Ordering::SeqCst) {
            return;
        }
        for (index, provider) in self.providers.iter().enumerate() {
            let readiness = provider.readiness();
            let tracker = Arc::clone(&self.readiness);
            let token = self.mirror_token.clone();
            self.mirror_tasks
                .spawn_on(mirror_readiness(index, readiness, tracker, token), &handle);
        }
    }

    /// Aggregate `AllReady` signal
    pub fn all_ready(&self) -> watch::Receiver<bool> {
        self.ensure_mirroring();
        self.readiness.subscribe()
    }

    /// Whether every provider currently reports ready
    pub fn is_all_ready(&self) -> bool {
        self.readiness.is_all_ready()
    }

    /// Initialization state of one provider
    pub fn state_of(&self, key: &ProviderKey) -> InitState {
        self.states.get(key).map(|s| *s).unwrap_or_default()
    }

    /// Whether the post-init hook has run
    pub fn hook_invoked(&self) -> bool {
        self.hook_invoked.load(Ordering::SeqCst)
    }

    /// Number of managed providers
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Stop the readiness mirroring tasks and wait for them to exit
    pub async fn shutdown(&self) {
        self.mirror_token.cancel();
        self.mirror_tasks.close();
        self.mirror_tasks.wait().await;
        debug!("Readiness mirroring stopped");
    }
}

impl Drop for ProvidersInitializer {
    fn drop(&mut self) {
        self.mirror_token.cancel();
    }
}

impl std::fmt::Debug for ProvidersInitializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvidersInitializer")
            .field("providers", &self.providers.len())
            .field("all_ready", &self.readiness.is_all_ready())
            .field("hook_invoked", &self.hook_invoked())
            .field("init_timeout", &self.init_timeout)
            .finish_non_exhaustive()
    }
}

async fn mirror_readiness(
    index: usize,
    mut readiness: watch::Receiver<bool>,
    tracker: Arc<ReadinessTracker>,
    token: CancellationToken,
) {
    loop {
        let ready = *readiness.borrow_and_update();
        tracker.set(index, ready);
        tokio::select! {
            () = token.cancelled() => break,
            changed = readiness.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}

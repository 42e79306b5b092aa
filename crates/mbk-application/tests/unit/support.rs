//! Test doubles shared by the application suites

#![allow(dead_code)]

use async_trait::async_trait;
use mbk_domain::error::{Error, Result};
use mbk_domain::ports::providers::{BackendAnalytics, BackendAuth, BackendProvider, ReadinessFlag};
use mbk_domain::ports::vendor::{AdEventSink, AdNetwork, AdUnitHandle};
use mbk_domain::value_objects::{AdUnitSpec, AnalyticsParameter, AuthState, ProviderKey};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

// ============================================================================
// Log counting
// ============================================================================

/// Layer counting warning and error events
#[derive(Clone, Default)]
pub struct LevelCounter {
    warnings: Arc<AtomicUsize>,
    errors: Arc<AtomicUsize>,
}

impl LevelCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install as the thread-default subscriber until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn warnings(&self) -> usize {
        self.warnings.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

impl<S: tracing::Subscriber> Layer<S> for LevelCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level == Level::WARN {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        } else if level == Level::ERROR {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }
}

// ============================================================================
// Providers
// ============================================================================

/// Provider with scripted initialize duration, readiness delay and failure
pub struct TestProvider {
    key: ProviderKey,
    init_delay: Duration,
    ready_delay: Option<Duration>,
    failure: Option<String>,
    init_calls: AtomicUsize,
    readiness: Arc<ReadinessFlag>,
}

impl TestProvider {
    pub fn new(key: &str) -> Self {
        Self {
            key: ProviderKey::from(key),
            init_delay: Duration::ZERO,
            ready_delay: None,
            failure: None,
            init_calls: AtomicUsize::new(0),
            readiness: Arc::new(ReadinessFlag::new()),
        }
    }

    /// Provider that already reports ready
    pub fn ready(key: &str) -> Self {
        let provider = Self::new(key);
        provider.readiness.set_ready();
        provider
    }

    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    pub fn with_ready_delay(mut self, delay: Duration) -> Self {
        self.ready_delay = Some(delay);
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_owned());
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn flag(&self) -> Arc<ReadinessFlag> {
        Arc::clone(&self.readiness)
    }
}

#[async_trait]
impl BackendProvider for TestProvider {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn name(&self) -> &str {
        "test"
    }

    async fn initialize(&self, cancel: CancellationToken) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        tokio::select! {
            () = cancel.cancelled() => return Err(Error::cancelled("test provider initialize")),
            () = tokio::time::sleep(self.init_delay) => {}
        }
        if let Some(message) = &self.failure {
            return Err(Error::internal(message.clone()));
        }
        match self.ready_delay {
            Some(delay) => {
                let flag = Arc::clone(&self.readiness);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    flag.set_ready();
                });
            }
            None => self.readiness.set_ready(),
        }
        Ok(())
    }

    fn readiness(&self) -> watch::Receiver<bool> {
        self.readiness.subscribe()
    }
}

/// Auth implementation that only carries a key
pub struct StubAuth {
    key: ProviderKey,
    state: watch::Sender<AuthState>,
}

impl StubAuth {
    pub fn new(key: &str) -> Self {
        let (state, _) = watch::channel(AuthState::signed_out());
        Self {
            key: ProviderKey::from(key),
            state,
        }
    }
}

#[async_trait]
impl BackendAuth for StubAuth {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn is_signed_in(&self) -> bool {
        false
    }

    fn user_id(&self) -> Option<String> {
        None
    }

    async fn sign_in_anonymously(&self) -> Result<bool> {
        Ok(false)
    }

    async fn sign_in_with_email(&self, _email: &str, _password: &str) -> Result<bool> {
        Ok(false)
    }

    async fn sign_up_with_email(&self, _email: &str, _password: &str) -> Result<bool> {
        Ok(false)
    }

    async fn sign_in_with_platform(&self, _token: &str) -> Result<bool> {
        Ok(false)
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(())
    }

    fn auth_state(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

/// Analytics implementation that only carries a key
pub struct StubAnalytics {
    key: ProviderKey,
}

impl StubAnalytics {
    pub fn new(key: &str) -> Self {
        Self {
            key: ProviderKey::from(key),
        }
    }
}

impl BackendAnalytics for StubAnalytics {
    fn provider_key(&self) -> &ProviderKey {
        &self.key
    }

    fn log_event(&self, _name: &str, _parameters: &[AnalyticsParameter]) {}
}

// ============================================================================
// Vendor ad network
// ============================================================================

/// How scripted units answer a load request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadReply {
    Loaded,
    Failed(i32),
    /// No answer; the test drives the sink
    Silent,
}

#[derive(Default)]
struct NetworkLog {
    sinks: Vec<AdEventSink>,
    loads: usize,
    shows: usize,
    destroyed: usize,
}

struct NetworkShared {
    log: Mutex<NetworkLog>,
    reply: Mutex<LoadReply>,
}

/// Ad network whose units record calls and answer loads as scripted
#[derive(Clone)]
pub struct ScriptedNetwork {
    shared: Arc<NetworkShared>,
}

impl ScriptedNetwork {
    pub fn new(reply: LoadReply) -> Self {
        Self {
            shared: Arc::new(NetworkShared {
                log: Mutex::new(NetworkLog::default()),
                reply: Mutex::new(reply),
            }),
        }
    }

    pub fn set_reply(&self, reply: LoadReply) {
        *self.shared.reply.lock() = reply;
    }

    pub fn created(&self) -> usize {
        self.shared.log.lock().sinks.len()
    }

    pub fn loads(&self) -> usize {
        self.shared.log.lock().loads
    }

    pub fn shows(&self) -> usize {
        self.shared.log.lock().shows
    }

    pub fn destroyed(&self) -> usize {
        self.shared.log.lock().destroyed
    }

    /// Sink of the most recently created unit
    pub fn sink(&self) -> AdEventSink {
        self.shared
            .log
            .lock()
            .sinks
            .last()
            .cloned()
            .expect("no ad unit created yet")
    }

    /// Sink of the `index`-th created unit
    pub fn sink_at(&self, index: usize) -> AdEventSink {
        self.shared.log.lock().sinks[index].clone()
    }
}

impl AdNetwork for ScriptedNetwork {
    fn name(&self) -> &str {
        "scripted"
    }

    fn create_unit(&self, _spec: &AdUnitSpec, sink: AdEventSink) -> Box<dyn AdUnitHandle> {
        self.shared.log.lock().sinks.push(sink.clone());
        Box::new(ScriptedUnit {
            sink,
            shared: Arc::clone(&self.shared),
        })
    }
}

struct ScriptedUnit {
    sink: AdEventSink,
    shared: Arc<NetworkShared>,
}

impl AdUnitHandle for ScriptedUnit {
    fn load(&self) {
        self.shared.log.lock().loads += 1;
        match *self.shared.reply.lock() {
            LoadReply::Loaded => {
                self.sink.loaded();
            }
            LoadReply::Failed(code) => {
                self.sink.load_failed(code);
            }
            LoadReply::Silent => {}
        }
    }

    fn show(&self) {
        self.shared.log.lock().shows += 1;
    }

    fn destroy(&self) {
        self.shared.log.lock().destroyed += 1;
    }

    fn is_loaded(&self) -> bool {
        false
    }
}

/// Let spawned tasks (event pumps, reloads) run to quiescence
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

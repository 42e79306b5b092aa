//! Simulated ad network
//!
//! Ad objects answer through their [`AdEventSink`] after the configured
//! delays. A show reports `Shown` then `Paid(ecpm)`; full-screen units
//! report `Closed` after a second delay. Destroying an object silences any
//! event it still had scheduled.

use super::SimulatedSettings;
use mbk_domain::constants::LOAD_ERROR_UNKNOWN;
use mbk_domain::ports::vendor::{AdEventSink, AdNetwork, AdUnitHandle};
use mbk_domain::value_objects::{AdUnitSpec, ResourceClass};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct NetworkCounters {
    created: AtomicUsize,
    loads: AtomicUsize,
    shows: AtomicUsize,
}

#[derive(Debug, Clone, Copy)]
struct UnitTiming {
    load_delay: Duration,
    show_delay: Duration,
    load_failure_code: Option<i32>,
    ecpm: f64,
}

/// Ad SDK stand-in driven by timers
#[derive(Debug, Clone)]
pub struct SimulatedAdNetwork {
    timing: UnitTiming,
    counters: Arc<NetworkCounters>,
}

impl SimulatedAdNetwork {
    /// Create a network using the ad latencies from `settings`
    pub fn new(settings: &SimulatedSettings) -> Self {
        Self {
            timing: UnitTiming {
                load_delay: settings.load_delay,
                show_delay: settings.show_delay,
                load_failure_code: settings.load_failure_code,
                ecpm: settings.ecpm,
            },
            counters: Arc::new(NetworkCounters::default()),
        }
    }

    /// Number of ad objects constructed
    pub fn units_created(&self) -> usize {
        self.counters.created.load(Ordering::SeqCst)
    }

    /// Number of load requests received
    pub fn loads_requested(&self) -> usize {
        self.counters.loads.load(Ordering::SeqCst)
    }

    /// Number of show requests received
    pub fn shows_requested(&self) -> usize {
        self.counters.shows.load(Ordering::SeqCst)
    }
}

impl AdNetwork for SimulatedAdNetwork {
    fn name(&self) -> &str {
        "simulated"
    }

    fn create_unit(&self, spec: &AdUnitSpec, sink: AdEventSink) -> Box<dyn AdUnitHandle> {
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        debug!(
            unit_id = %spec.unit_id,
            format = %spec.format,
            generation = sink.generation(),
            "Simulated ad object created"
        );
        Box::new(SimulatedAdUnit {
            unit_id: spec.unit_id.clone(),
            consumable: spec.resource_class() == ResourceClass::Consumable,
            sink,
            timing: self.timing,
            loaded: Arc::new(AtomicBool::new(false)),
            destroyed: CancellationToken::new(),
            counters: Arc::clone(&self.counters),
        })
    }
}

struct SimulatedAdUnit {
    unit_id: String,
    consumable: bool,
    sink: AdEventSink,
    timing: UnitTiming,
    loaded: Arc<AtomicBool>,
    destroyed: CancellationToken,
    counters: Arc<NetworkCounters>,
}

impl SimulatedAdUnit {
    /// Run `task` on the current runtime; `false` when there is none
    fn spawn<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(task);
                true
            }
            Err(_) => {
                warn!(unit_id = %self.unit_id, "No tokio runtime, simulated ad event dropped");
                false
            }
        }
    }
}

/// Sleep unless the object is destroyed first; `false` when destroyed
async fn pause(destroyed: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        biased;
        () = destroyed.cancelled() => false,
        () = tokio::time::sleep(delay) => true,
    }
}

impl AdUnitHandle for SimulatedAdUnit {
    fn load(&self) {
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        let sink = self.sink.clone();
        let loaded = Arc::clone(&self.loaded);
        let destroyed = self.destroyed.clone();
        let timing = self.timing;
        let spawned = self.spawn(async move {
            if !pause(&destroyed, timing.load_delay).await {
                return;
            }
            match timing.load_failure_code {
                Some(code) => {
                    sink.load_failed(code);
                }
                None => {
                    loaded.store(true, Ordering::SeqCst);
                    sink.loaded();
                }
            }
        });
        if !spawned {
            self.sink.load_failed(LOAD_ERROR_UNKNOWN);
        }
    }

    fn show(&self) {
        self.counters.shows.fetch_add(1, Ordering::SeqCst);
        let was_loaded = if self.consumable {
            self.loaded.swap(false, Ordering::SeqCst)
        } else {
            self.loaded.load(Ordering::SeqCst)
        };
        if !was_loaded {
            self.sink.failed_to_show();
            return;
        }

        let sink = self.sink.clone();
        let destroyed = self.destroyed.clone();
        let timing = self.timing;
        let consumable = self.consumable;
        let spawned = self.spawn(async move {
            if !pause(&destroyed, timing.show_delay).await {
                return;
            }
            sink.shown();
            sink.paid(timing.ecpm);
            if consumable && pause(&destroyed, timing.show_delay).await {
                sink.closed();
            }
        });
        if !spawned {
            self.sink.failed_to_show();
        }
    }

    fn destroy(&self) {
        self.destroyed.cancel();
        self.loaded.store(false, Ordering::SeqCst);
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }
}

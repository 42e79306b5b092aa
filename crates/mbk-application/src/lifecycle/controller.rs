//! Ad Unit Lifecycle Controller
//!
//! Drives one vendor ad unit through `Idle → Loading → {Loaded, Failed}`.
//! Consumable units (interstitial, rewarded) continue
//! `Loaded → Showing → Consumed → Loading` with an automatic reload after
//! every completed cycle; persistent units (banner) continue
//! `Loaded → Showing → Hidden → Idle`.
//!
//! Vendor callbacks arrive through an [`AdEventSink`] and are applied by a
//! single pump task per controller, so every state mutation happens under
//! one short lock and in vendor order.
//!
//! - at most one load is in flight; each attempt owns one completion slot
//! - at most one underlying vendor object is alive
//! - a consumption cycle completes only when the primary signal and
//!   "closed" have both arrived, and its callback runs exactly once
//! - events from destroyed objects are discarded by generation

use super::join::PairBarrier;
use crate::events::EventBus;
use mbk_domain::constants::LOAD_ERROR_UNKNOWN;
use mbk_domain::error::{Error, Result};
use mbk_domain::events::BackendEvent;
use mbk_domain::ports::providers::CompletionCallback;
use mbk_domain::ports::vendor::{
    AdEventSink, AdNetwork, AdUnitHandle, TaggedAdEvent, VendorAdEvent,
};
use mbk_domain::value_objects::{
    AdRevenue, AdUnitSpec, LoadOutcome, PrimarySignal, ProviderKey, ResourceClass, ResourceState,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Vendor answer to one load attempt: `Err` carries the vendor code
type LoadSignal = std::result::Result<(), i32>;

/// Lifecycle controller for one ad unit
pub struct AdUnitController {
    spec: AdUnitSpec,
    provider_key: ProviderKey,
    network: Arc<dyn AdNetwork>,
    readiness: watch::Receiver<bool>,
    inner: Mutex<UnitInner>,
    state: watch::Sender<ResourceState>,
    events: EventBus,
    vendor_events: mpsc::UnboundedSender<TaggedAdEvent>,
    shutdown: CancellationToken,
}

struct UnitInner {
    handle: Option<Box<dyn AdUnitHandle>>,
    /// Generation of the live handle, 0 when there is none
    generation: u64,
    next_generation: u64,
    loading: bool,
    pending_load: Option<oneshot::Sender<LoadSignal>>,
    pending_show: Option<PendingShow>,
    disposed: bool,
}

struct PendingShow {
    join: PairBarrier<PrimarySignal, ()>,
    on_consumed: CompletionCallback,
}

enum BeginLoad {
    Started(oneshot::Receiver<LoadSignal>),
    AlreadyLoading,
    Skipped,
}

enum Settled {
    Loaded,
    Failed(i32),
    Cancelled,
}

#[derive(Clone, Copy)]
enum JoinSide {
    Primary,
    Closed,
}

impl AdUnitController {
    /// Create a controller and start its vendor event pump
    ///
    /// `readiness` is the owning provider's readiness flag; loads and shows
    /// are skipped while it is unset. Fails outside a tokio runtime.
    pub fn new(
        spec: AdUnitSpec,
        provider_key: ProviderKey,
        readiness: watch::Receiver<bool>,
        network: Arc<dyn AdNetwork>,
        events: EventBus,
    ) -> Result<Arc<Self>> {
        let runtime = Handle::try_current().map_err(|_| {
            Error::internal(format!(
                "ad unit '{}' needs a tokio runtime for its event pump",
                spec.unit_id
            ))
        })?;
        let (vendor_events, vendor_rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(ResourceState::Idle);
        let controller = Arc::new(Self {
            spec,
            provider_key,
            network,
            readiness,
            inner: Mutex::new(UnitInner {
                handle: None,
                generation: 0,
                next_generation: 1,
                loading: false,
                pending_load: None,
                pending_show: None,
                disposed: false,
            }),
            state,
            events,
            vendor_events,
            shutdown: CancellationToken::new(),
        });
        runtime.spawn(pump_vendor_events(
            Arc::downgrade(&controller),
            vendor_rx,
            controller.shutdown.clone(),
        ));
        debug!(
            unit_id = %controller.spec.unit_id,
            format = %controller.spec.format,
            network = controller.network.name(),
            "Ad unit controller created"
        );
        Ok(controller)
    }

    /// Unit specification
    pub fn spec(&self) -> &AdUnitSpec {
        &self.spec
    }

    /// Vendor ad unit identifier
    pub fn unit_id(&self) -> &str {
        &self.spec.unit_id
    }

    /// Current lifecycle state
    pub fn state(&self) -> ResourceState {
        *self.state.borrow()
    }

    /// Subscribe to lifecycle state changes
    pub fn state_changes(&self) -> watch::Receiver<ResourceState> {
        self.state.subscribe()
    }

    /// Subscribe to error, revenue and state events
    pub fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.events.subscribe()
    }

    /// Whether the unit is loaded and ready to show
    pub fn is_ready(&self) -> bool {
        self.state() == ResourceState::Loaded
    }

    /// Whether a show is waiting for its completion signals
    pub fn has_pending_show(&self) -> bool {
        self.inner.lock().pending_show.is_some()
    }

    /// Whether the controller was disposed
    pub fn is_disposed(&self) -> bool {
        self.inner.lock().disposed
    }

    /// Load the unit
    ///
    /// Returns [`LoadOutcome::Skipped`] while the provider is not ready and
    /// [`LoadOutcome::AlreadyLoading`] while another load is in flight; in
    /// both cases nothing is issued to the vendor.
    pub async fn load(&self, cancel: CancellationToken) -> Result<LoadOutcome> {
        if cancel.is_cancelled() {
            return Err(self.cancelled("load"));
        }
        let pending = match self.begin_load()? {
            BeginLoad::Started(pending) => pending,
            BeginLoad::AlreadyLoading => return Ok(LoadOutcome::AlreadyLoading),
            BeginLoad::Skipped => return Ok(LoadOutcome::Skipped),
        };
        self.finish_load(pending, cancel).await?;
        Ok(LoadOutcome::Loaded)
    }

    fn begin_load(&self) -> Result<BeginLoad> {
        let unit_id = self.spec.unit_id.as_str();
        let mut inner = self.inner.lock();
        if inner.disposed {
            return Err(Error::disposed(unit_id));
        }
        if !self.provider_ready() {
            drop(inner);
            warn!(unit_id, provider = %self.provider_key, "Provider not ready, load skipped");
            self.publish_error(format!("provider '{}' is not ready", self.provider_key));
            return Ok(BeginLoad::Skipped);
        }
        if inner.loading {
            debug!(unit_id, "Load already in flight");
            return Ok(BeginLoad::AlreadyLoading);
        }
        inner.loading = true;

        if self.spec.resource_class() == ResourceClass::Persistent
            && let Some(previous) = inner.handle.take()
        {
            debug!(unit_id, generation = inner.generation, "Destroying previous ad object");
            previous.destroy();
        }
        if inner.handle.is_none() {
            let generation = inner.next_generation;
            inner.next_generation += 1;
            let sink = AdEventSink::new(generation, self.vendor_events.clone());
            inner.handle = Some(self.network.create_unit(&self.spec, sink));
            inner.generation = generation;
        }

        let (settle, pending) = oneshot::channel();
        inner.pending_load = Some(settle);
        if let Some(handle) = inner.handle.as_ref() {
            handle.load();
        }
        self.set_state(ResourceState::Loading);
        info!(unit_id, format = %self.spec.format, "Loading ad unit");
        Ok(BeginLoad::Started(pending))
    }

    async fn finish_load(
        &self,
        pending: oneshot::Receiver<LoadSignal>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let settled = tokio::select! {
            biased;
            () = cancel.cancelled() => Settled::Cancelled,
            () = self.shutdown.cancelled() => Settled::Cancelled,
            signal = pending => match signal {
                Ok(Ok(())) => Settled::Loaded,
                Ok(Err(code)) => Settled::Failed(code),
                Err(_) => Settled::Cancelled,
            },
        };

        let unit_id = self.spec.unit_id.as_str();
        let mut inner = self.inner.lock();
        inner.loading = false;
        let unanswered = inner.pending_load.take().is_some();
        match settled {
            Settled::Loaded => {
                self.set_state(ResourceState::Loaded);
                info!(unit_id, "Ad unit loaded");
                Ok(())
            }
            Settled::Cancelled => {
                // A late vendor answer must not settle the next attempt
                if unanswered && let Some(handle) = inner.handle.take() {
                    debug!(unit_id, generation = inner.generation, "Retiring ad object with an unanswered load");
                    handle.destroy();
                    inner.generation = 0;
                }
                if !inner.disposed {
                    self.set_state(ResourceState::Idle);
                }
                info!(unit_id, "Ad unit load cancelled");
                Err(self.cancelled("load"))
            }
            Settled::Failed(code) => {
                self.set_state(ResourceState::Failed);
                drop(inner);
                warn!(unit_id, code, "Ad unit failed to load");
                self.publish_error(format!("load failed with code {code}"));
                Err(Error::load_failed(unit_id, code))
            }
        }
    }

    /// Show a consumable unit
    ///
    /// Loads first when the unit is not loaded (or waits for the load in
    /// flight). `on_consumed` runs once the vendor reported both the primary
    /// signal and "closed"; after that the unit reloads automatically.
    /// Returns once the show was issued.
    pub async fn show(&self, on_consumed: CompletionCallback, cancel: CancellationToken) -> Result<()> {
        self.require_class(ResourceClass::Consumable, "show")?;
        self.arm_show(on_consumed)?;

        if let Err(e) = self.ensure_loaded(&cancel).await {
            self.inner.lock().pending_show = None;
            return Err(e);
        }

        let unit_id = self.spec.unit_id.as_str();
        let mut inner = self.inner.lock();
        if inner.disposed {
            return Err(Error::disposed(unit_id));
        }
        if inner.pending_show.is_none() {
            return Err(self.cancelled("show"));
        }
        if inner.handle.is_none() {
            inner.pending_show = None;
            return Err(Error::internal(format!(
                "ad unit '{unit_id}' is loaded without an ad object"
            )));
        }
        if let Some(handle) = inner.handle.as_ref() {
            handle.show();
        }
        self.set_state(ResourceState::Showing);
        info!(unit_id, format = %self.spec.format, "Showing ad unit");
        Ok(())
    }

    fn arm_show(&self, on_consumed: CompletionCallback) -> Result<()> {
        let unit_id = self.spec.unit_id.as_str();
        let mut inner = self.inner.lock();
        if inner.disposed {
            return Err(Error::disposed(unit_id));
        }
        if !self.provider_ready() {
            drop(inner);
            warn!(unit_id, provider = %self.provider_key, "Provider not ready, show rejected");
            self.publish_error(format!("provider '{}' is not ready", self.provider_key));
            return Err(Error::not_ready(self.provider_key.clone()));
        }
        if inner.pending_show.is_some() {
            warn!(unit_id, "Show already pending");
            return Err(Error::show_pending(unit_id));
        }
        inner.pending_show = Some(PendingShow {
            join: PairBarrier::new(),
            on_consumed,
        });
        Ok(())
    }

    /// Display a persistent unit, loading it first when needed
    pub async fn display(&self, cancel: CancellationToken) -> Result<()> {
        self.require_class(ResourceClass::Persistent, "display")?;
        self.ensure_loaded(&cancel).await?;

        let unit_id = self.spec.unit_id.as_str();
        let inner = self.inner.lock();
        if inner.disposed {
            return Err(Error::disposed(unit_id));
        }
        let Some(handle) = inner.handle.as_ref() else {
            return Err(Error::internal(format!(
                "ad unit '{unit_id}' is loaded without an ad object"
            )));
        };
        handle.show();
        self.set_state(ResourceState::Showing);
        info!(unit_id, "Displaying ad unit");
        Ok(())
    }

    /// Destroy the underlying object of a persistent unit
    ///
    /// A load in flight settles as cancelled.
    pub fn hide(&self) -> Result<()> {
        self.require_class(ResourceClass::Persistent, "hide")?;
        let unit_id = self.spec.unit_id.as_str();
        let mut inner = self.inner.lock();
        let Some(handle) = inner.handle.take() else {
            debug!(unit_id, "No ad object to hide");
            return Ok(());
        };
        handle.destroy();
        inner.generation = 0;
        inner.pending_load = None;
        self.set_state(ResourceState::Hidden);
        self.set_state(ResourceState::Idle);
        info!(unit_id, "Ad unit hidden");
        Ok(())
    }

    async fn ensure_loaded(&self, cancel: &CancellationToken) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }
        debug!(unit_id = %self.spec.unit_id, "Ad unit not loaded, loading first");
        match self.load(cancel.clone()).await? {
            LoadOutcome::Loaded => Ok(()),
            LoadOutcome::AlreadyLoading => self.wait_load_settled(cancel).await,
            LoadOutcome::Skipped => Err(Error::not_ready(self.provider_key.clone())),
        }
    }

    async fn wait_load_settled(&self, cancel: &CancellationToken) -> Result<()> {
        let mut state = self.state.subscribe();
        let settled = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(self.cancelled("load")),
            () = self.shutdown.cancelled() => return Err(Error::disposed(&self.spec.unit_id)),
            settled = state.wait_for(|s| !s.is_loading()) => settled
                .map(|s| *s)
                .map_err(|_| Error::disposed(&self.spec.unit_id))?,
        };
        match settled {
            ResourceState::Loaded => Ok(()),
            // The load we waited on was cancelled by its own caller
            ResourceState::Idle => Err(self.cancelled("load")),
            _ => Err(Error::load_failed(&self.spec.unit_id, LOAD_ERROR_UNKNOWN)),
        }
    }

    /// Release everything; idempotent
    ///
    /// Cancels the load in flight, destroys the object, drops a pending
    /// completion callback uninvoked and stops the event pump.
    pub fn dispose(&self) {
        let mut inner = self.inner.lock();
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        self.shutdown.cancel();
        inner.pending_load = None;
        inner.pending_show = None;
        if let Some(handle) = inner.handle.take() {
            handle.destroy();
        }
        inner.generation = 0;
        self.set_state(ResourceState::Idle);
        info!(unit_id = %self.spec.unit_id, "Ad unit disposed");
    }

    fn handle_vendor_event(self: &Arc<Self>, tagged: TaggedAdEvent) {
        let unit_id = self.spec.unit_id.as_str();
        let mut completed = None;
        let mut show_failed = false;
        let mut revenue = None;
        {
            let mut inner = self.inner.lock();
            if inner.disposed || tagged.generation != inner.generation {
                trace!(unit_id, generation = tagged.generation, "Discarding stale ad event");
                return;
            }
            match tagged.event {
                VendorAdEvent::Loaded => self.settle_load(&mut inner, Ok(())),
                VendorAdEvent::LoadFailed(code) => self.settle_load(&mut inner, Err(code)),
                VendorAdEvent::Shown => {
                    debug!(unit_id, "Ad unit on screen");
                    if self.spec.primary_signal == PrimarySignal::Shown {
                        completed = self.offer_signal(&mut inner, JoinSide::Primary);
                    }
                }
                VendorAdEvent::Paid(ecpm) => {
                    revenue = Some(AdRevenue::from_ecpm(unit_id, ecpm));
                    if self.spec.primary_signal == PrimarySignal::Paid {
                        completed = self.offer_signal(&mut inner, JoinSide::Primary);
                    }
                }
                VendorAdEvent::Clicked => debug!(unit_id, "Ad unit clicked"),
                VendorAdEvent::Closed => {
                    debug!(unit_id, "Ad unit closed");
                    completed = self.offer_signal(&mut inner, JoinSide::Closed);
                }
                VendorAdEvent::FailedToShow => {
                    inner.pending_show = None;
                    show_failed = true;
                }
            }
            if completed.is_some() {
                self.set_state(ResourceState::Consumed);
            } else if show_failed {
                self.set_state(ResourceState::Failed);
            }
        }

        if let Some(revenue) = revenue {
            info!(unit_id, amount = revenue.amount, "Ad revenue");
            self.events.publish(BackendEvent::AdRevenue {
                unit_id: revenue.unit_id,
                amount: revenue.amount,
            });
        }
        if let Some(on_consumed) = completed {
            info!(unit_id, "Ad unit consumed");
            on_consumed();
            self.reload_after_cycle();
        }
        if show_failed {
            warn!(unit_id, "Ad unit failed to show");
            self.publish_error("failed to show".to_owned());
            self.reload_after_cycle();
        }
    }

    fn settle_load(&self, inner: &mut UnitInner, signal: LoadSignal) {
        match inner.pending_load.take() {
            Some(settle) => {
                let _ = settle.send(signal);
            }
            None => debug!(unit_id = %self.spec.unit_id, ?signal, "Load signal without a pending load"),
        }
    }

    fn offer_signal(&self, inner: &mut UnitInner, side: JoinSide) -> Option<CompletionCallback> {
        let Some(show) = inner.pending_show.as_mut() else {
            trace!(unit_id = %self.spec.unit_id, "Completion signal without a pending show");
            return None;
        };
        let joined = match side {
            JoinSide::Primary => show.join.offer_left(self.spec.primary_signal),
            JoinSide::Closed => show.join.offer_right(()),
        };
        joined?;
        inner.pending_show.take().map(|show| show.on_consumed)
    }

    /// Start the single reload that follows a consumption cycle
    fn reload_after_cycle(self: &Arc<Self>) {
        if self.spec.resource_class() != ResourceClass::Consumable {
            return;
        }
        match self.begin_load() {
            Ok(BeginLoad::Started(pending)) => {
                let controller = Arc::clone(self);
                let cancel = self.shutdown.child_token();
                tokio::spawn(async move {
                    if let Err(e) = controller.finish_load(pending, cancel).await {
                        debug!(unit_id = %controller.spec.unit_id, error = %e, "Automatic reload did not complete");
                    }
                });
            }
            Ok(_) => debug!(unit_id = %self.spec.unit_id, "Automatic reload not started"),
            Err(e) => debug!(unit_id = %self.spec.unit_id, error = %e, "Automatic reload not started"),
        }
    }

    fn set_state(&self, next: ResourceState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            trace!(unit_id = %self.spec.unit_id, state = ?next, "Ad unit state changed");
            self.events.publish(BackendEvent::AdStateChanged {
                unit_id: self.spec.unit_id.clone(),
                state: next,
            });
        }
    }

    fn publish_error(&self, message: String) {
        self.events.publish(BackendEvent::AdError {
            unit_id: self.spec.unit_id.clone(),
            format: self.spec.format,
            message,
        });
    }

    fn provider_ready(&self) -> bool {
        *self.readiness.borrow()
    }

    fn require_class(&self, class: ResourceClass, operation: &str) -> Result<()> {
        if self.spec.resource_class() == class {
            Ok(())
        } else {
            Err(Error::invalid_argument(format!(
                "{operation} is not supported for {} unit '{}'",
                self.spec.format, self.spec.unit_id
            )))
        }
    }

    fn cancelled(&self, operation: &str) -> Error {
        Error::cancelled(format!("{operation} of ad unit '{}'", self.spec.unit_id))
    }
}

impl Drop for AdUnitController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for AdUnitController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdUnitController")
            .field("unit_id", &self.spec.unit_id)
            .field("format", &self.spec.format)
            .field("provider", &self.provider_key)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

async fn pump_vendor_events(
    controller: Weak<AdUnitController>,
    mut vendor_rx: mpsc::UnboundedReceiver<TaggedAdEvent>,
    shutdown: CancellationToken,
) {
    loop {
        let tagged = tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            next = vendor_rx.recv() => match next {
                Some(tagged) => tagged,
                None => break,
            },
        };
        let Some(controller) = controller.upgrade() else {
            break;
        };
        controller.handle_vendor_event(tagged);
    }
    trace!("Ad event pump stopped");
}

//! Backend Event Bus
//!
//! In-process broadcast of [`BackendEvent`]s for listeners that are not
//! awaiting the originating call: initialization progress, ad errors, ad
//! revenue and ad state changes.
//!
//! ```ignore
//! let bus = EventBus::new();
//! let mut events = bus.subscribe_stream();
//! bus.publish(BackendEvent::AllProvidersReady { provider_count: 2 });
//! ```

use futures::Stream;
use futures::stream;
use mbk_domain::constants::EVENT_CHANNEL_CAPACITY;
use mbk_domain::events::BackendEvent;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Boxed stream of backend events
pub type BackendEventStream = Pin<Box<dyn Stream<Item = BackendEvent> + Send>>;

/// Event bus over a tokio broadcast channel
///
/// When the channel is full, the oldest events are dropped; lagging
/// subscribers skip ahead.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<BackendEvent>>,
    capacity: usize,
}

impl EventBus {
    /// Create a bus with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    /// Create with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
            capacity,
        }
    }

    /// Publish an event to current subscribers
    pub fn publish(&self, event: BackendEvent) {
        match self.sender.send(event) {
            Ok(count) => trace!(subscribers = count, "Published backend event"),
            Err(_) => trace!("Published backend event but no subscribers"),
        }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.sender.subscribe()
    }

    /// Subscribe as a stream that skips over lagged events
    pub fn subscribe_stream(&self) -> BackendEventStream {
        let receiver = self.sender.subscribe();
        let stream = stream::unfold(receiver, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => return Some((event, rx)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Event stream lagged by {} events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });
        Box::pin(stream)
    }

    /// Current number of subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Whether anyone is listening
    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

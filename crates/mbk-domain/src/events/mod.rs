//! Domain events

mod backend_events;

pub use backend_events::BackendEvent;

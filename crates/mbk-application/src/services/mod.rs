//! Application services
//!
//! Capability resolution and provider initialization.

pub mod backend_service;
pub mod initializer;
pub mod selector;

pub use backend_service::BackendService;
pub use initializer::{NoopPostInitHook, PostInitHook, ProvidersInitializer, ReadinessTracker};
pub use selector::BackendSelector;

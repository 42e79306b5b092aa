//! # Multi-Backend Kit - Application Layer
//!
//! Orchestration over the domain ports:
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`registry`] | Capability registry, builder and backend catalog |
//! | [`services`] | Three-tier selection and provider initialization |
//! | [`lifecycle`] | Ad unit controllers and the managed ads capability |
//! | [`events`] | Backend event bus |
//!
//! Concrete backends live in `mbk-providers` and register themselves through
//! the [`registry::BACKENDS`] slice.

pub mod events;
pub mod lifecycle;
pub mod registry;
pub mod services;

pub use events::{BackendEventStream, EventBus};
pub use lifecycle::{AdUnitController, AdUnitSet, ManagedAds, PairBarrier};
pub use registry::{
    BackendEntry, BackendEntryConfig, Capability, CapabilityImpl, ProviderRegistry,
    ProviderRegistryBuilder,
};
pub use services::{
    BackendSelector, BackendService, NoopPostInitHook, PostInitHook, ProvidersInitializer,
};

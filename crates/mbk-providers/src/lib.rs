//! # Multi-Backend Kit - Backend Implementations
//!
//! Concrete backend families. Each family implements the capability ports
//! defined in `mbk-domain` and submits a `BackendEntry` into the
//! `mbk_application::registry::BACKENDS` slice, so linking this crate is
//! enough to make the families selectable by key.
//!
//! ## Backends
//!
//! | Key | Provider | Auth | Analytics | Data Store | Ads | Offerwall |
//! |-----|----------|------|-----------|------------|-----|-----------|
//! | `NONE` | Null | Null | Null | Null | - | Null |
//! | `SIMULATED` | Simulated | In-memory | Recorded | `DashMap` | Managed | Canned |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! mbk-providers = { version = "0.1", default-features = false }
//! ```
//!
//! The `NONE` backend is always available; `backend-simulated` adds the
//! simulated family.
//!
//! ## Usage
//!
//! ```ignore
//! // Force linkme registration of all backends
//! extern crate mbk_providers;
//! ```

pub use mbk_domain::error::{Error, Result};

/// Backend-specific constants
pub mod constants;

/// No-op fallback backend registered under `NONE`
pub mod null;

/// In-process backend with scripted latencies
#[cfg(feature = "backend-simulated")]
pub mod simulated;

pub use null::{NullAnalytics, NullAuth, NullDataStore, NullOfferwall, NullProvider};
#[cfg(feature = "backend-simulated")]
pub use simulated::{
    SimulatedAdNetwork, SimulatedAnalytics, SimulatedAuth, SimulatedDataStore, SimulatedOfferwall,
    SimulatedProvider, SimulatedSettings,
};

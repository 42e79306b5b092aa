//! # Multi-Backend Kit
//!
//! One API over interchangeable backend families (auth, analytics, data
//! store, ads, offerwall). Backends register into an immutable registry,
//! callers select implementations by key with a configured fallback, and the
//! providers initializer gates startup on every backend being initialized
//! and ready.
//!
//! ## Example
//!
//! ```ignore
//! use mbk::infrastructure::{ConfigLoader, init_backends};
//!
//! let context = init_backends(ConfigLoader::new().load()?).await?;
//! context.start().await?;
//!
//! let auth = context.service().auth(None)?;
//! auth.sign_in_anonymously().await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Ports, value objects, events and the error type
//! - `application` - Registry, selection, initialization and ad lifecycle
//! - `providers` - Compiled-in backend families (`NONE`, `SIMULATED`)
//! - `infrastructure` - Configuration, logging, shutdown and bootstrap

/// Domain layer - ports, value objects and errors
pub mod domain {
    pub use mbk_domain::*;
}

/// Application layer - registry, selector, initializer and ad controllers
pub mod application {
    pub use mbk_application::*;
}

/// Backend families registered through the catalog
pub mod providers {
    pub use mbk_providers::*;
}

/// Infrastructure layer - config, logging, shutdown and bootstrap
pub mod infrastructure {
    pub use mbk_infrastructure::*;
}

pub mod cli;

pub use domain::error::{Error, Result};
pub use domain::value_objects::{CapabilityKind, ProviderKey};
pub use infrastructure::{AppConfig, BackendContext, ConfigLoader, init_backends};

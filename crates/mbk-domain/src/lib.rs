//! # Multi-Backend Kit - Domain Layer
//!
//! Core types shared by every layer: capability ports, vendor SDK ports,
//! value objects, backend events and the error taxonomy.
//!
//! This crate holds no orchestration logic; the registry, selector,
//! initializer and lifecycle controller live in `mbk-application`.

pub mod constants;
pub mod error;
pub mod events;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use events::BackendEvent;
pub use value_objects::{CapabilityKind, ProviderKey};

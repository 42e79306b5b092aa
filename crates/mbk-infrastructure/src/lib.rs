//! # Multi-Backend Kit - Infrastructure Layer
//!
//! Cross-cutting technical concerns and the composition root.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment configuration: defaults, `mbk.toml`, `MBK__` env |
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context extension for foreign errors |
//! | [`shutdown`] | Background task cancellation and tracking |
//! | [`bootstrap`] | Registry, selector and initializer built from config |
//! | [`constants`] | Centralized configuration constants |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod shutdown;

pub use bootstrap::{BackendContext, build_registry, init_backends, init_backends_with_hook};
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
pub use shutdown::ShutdownCoordinator;

//! Configuration
//!
//! Layered with Figment: [`AppConfig::default`], then a TOML file
//! (`mbk.toml`), then `MBK__`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AdUnitsConfig, AppConfig, BackendsConfig, LoggingConfig, SimulatedConfig};

//! Backend Catalog
//!
//! Compile-time registration of backend families. Each backend crate submits
//! a [`BackendEntry`] into the [`BACKENDS`] distributed slice; at startup the
//! enabled entries are asked to register their capability implementations
//! into a [`ProviderRegistryBuilder`].
//!
//! ```ignore
//! #[linkme::distributed_slice(BACKENDS)]
//! static NULL_BACKEND: BackendEntry = BackendEntry {
//!     key: "NONE",
//!     description: "No-op fallback backend",
//!     register: register_null_backend,
//! };
//! ```

use super::ProviderRegistryBuilder;
use crate::lifecycle::AdUnitSet;
use mbk_domain::error::{Error, Result};
use mbk_domain::value_objects::ProviderKey;
use std::collections::HashMap;
use std::str::FromStr;

/// Settings handed to a backend's registration function
///
/// Backends read what they need and ignore the rest.
#[derive(Debug, Clone)]
pub struct BackendEntryConfig {
    /// Key the backend registers its implementations under
    pub key: ProviderKey,
    /// Ad units, for backends that provide advertising
    pub ads: Option<AdUnitSet>,
    /// Additional backend-specific settings
    pub extra: HashMap<String, String>,
}

impl BackendEntryConfig {
    /// Create a config for the given key
    pub fn new(key: impl Into<ProviderKey>) -> Self {
        Self {
            key: key.into(),
            ads: None,
            extra: HashMap::new(),
        }
    }

    /// Set the ad units
    pub fn with_ads(mut self, ads: AdUnitSet) -> Self {
        self.ads = Some(ads);
        self
    }

    /// Add an extra setting
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Parse an extra setting, `Ok(None)` when absent
    pub fn extra_parsed<T: FromStr>(&self, name: &str) -> Result<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        self.extra
            .get(name)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| {
                    Error::config(format!(
                        "invalid value '{raw}' for '{name}' of backend '{}': {e}",
                        self.key
                    ))
                })
            })
            .transpose()
    }
}

/// Registry entry for a backend family
pub struct BackendEntry {
    /// Provider key the family registers under by default (e.g. "NONE")
    pub key: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Registers the family's capability implementations
    pub register: fn(&mut ProviderRegistryBuilder, &BackendEntryConfig) -> Result<()>,
}

// Auto-collection via linkme distributed slices - backends submit entries at compile time
#[linkme::distributed_slice]
pub static BACKENDS: [BackendEntry] = [..];

/// Find a backend family by key
pub fn find_backend(key: &str) -> Result<&'static BackendEntry> {
    BACKENDS.iter().find(|entry| entry.key == key).ok_or_else(|| {
        let available: Vec<&str> = BACKENDS.iter().map(|e| e.key).collect();
        Error::not_found(format!(
            "Unknown backend '{key}'. Available backends: {available:?}"
        ))
    })
}

/// List all compiled-in backend families
///
/// Returns `(key, description)` pairs sorted by key.
pub fn list_backends() -> Vec<(&'static str, &'static str)> {
    let mut backends: Vec<(&'static str, &'static str)> =
        BACKENDS.iter().map(|e| (e.key, e.description)).collect();
    backends.sort_by_key(|(key, _)| *key);
    backends
}

/// Register each configured backend, in order
///
/// The order of `configs` is the registration order, so the first entry
/// becomes the default key for every kind it provides.
pub fn register_backends(
    builder: &mut ProviderRegistryBuilder,
    configs: &[BackendEntryConfig],
) -> Result<()> {
    for config in configs {
        let entry = find_backend(config.key.as_str())?;
        (entry.register)(builder, config)?;
        tracing::info!(backend = entry.key, "Backend registered");
    }
    Ok(())
}

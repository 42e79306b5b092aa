//! Backend Selector
//!
//! Three-tier resolution of a capability implementation:
//!
//! 1. exact: the requested key is registered for the kind
//! 2. fallback: the requested key is missing and the fallback key (`NONE` by
//!    default) is registered; one warning is logged
//! 3. error: nothing usable; one error is logged and
//!    [`Error::NoImplementation`] is returned
//!
//! Omitting the key asks for the default, which is the first key registered
//! for the kind.

use crate::registry::{Capability, CapabilityImpl, ProviderRegistry};
use mbk_domain::error::{Error, Result};
use mbk_domain::value_objects::{CapabilityKind, ProviderKey};
use std::sync::Arc;
use tracing::{error, warn};

/// Resolves capability implementations from a registry
#[derive(Debug, Clone)]
pub struct BackendSelector {
    registry: Arc<ProviderRegistry>,
    fallback_key: ProviderKey,
}

impl BackendSelector {
    /// Create a selector with an explicit fallback key
    pub fn new(registry: Arc<ProviderRegistry>, fallback_key: ProviderKey) -> Self {
        Self {
            registry,
            fallback_key,
        }
    }

    /// Create a selector that falls back to `NONE`
    pub fn with_default_fallback(registry: Arc<ProviderRegistry>) -> Self {
        Self::new(registry, ProviderKey::none())
    }

    /// The registry this selector reads from
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// The configured fallback key
    pub fn fallback_key(&self) -> &ProviderKey {
        &self.fallback_key
    }

    /// Resolve a typed implementation
    pub fn resolve<C: Capability + ?Sized>(&self, key: Option<&ProviderKey>) -> Result<Arc<C>> {
        let selected = self.select_key(C::KIND, key)?;
        self.registry.get::<C>(&selected)
    }

    /// Resolve an untyped implementation
    pub fn resolve_kind(
        &self,
        kind: CapabilityKind,
        key: Option<&ProviderKey>,
    ) -> Result<CapabilityImpl> {
        let selected = self.select_key(kind, key)?;
        self.registry.lookup(kind, &selected)
    }

    /// Decide which registered key serves a request
    pub fn select_key(&self, kind: CapabilityKind, key: Option<&ProviderKey>) -> Result<ProviderKey> {
        match key {
            Some(requested) if self.registry.contains(kind, requested) => Ok(requested.clone()),
            Some(requested) => {
                if self.registry.contains(kind, &self.fallback_key) {
                    warn!(
                        kind = %kind,
                        requested = %requested,
                        fallback = %self.fallback_key,
                        "Requested key missing, substituted fallback"
                    );
                    Ok(self.fallback_key.clone())
                } else {
                    error!(
                        kind = %kind,
                        requested = %requested,
                        fallback = %self.fallback_key,
                        "No implementation registered for requested key or fallback"
                    );
                    Err(Error::no_implementation(
                        kind,
                        format!(
                            "neither '{requested}' nor fallback '{}' is registered",
                            self.fallback_key
                        ),
                    ))
                }
            }
            None => match self.registry.default_key(kind) {
                Some(default) => Ok(default),
                None => {
                    error!(kind = %kind, "No default implementation registered");
                    Err(Error::no_implementation(kind, "no implementation is registered"))
                }
            },
        }
    }
}

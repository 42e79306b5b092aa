//! Null Backend
//!
//! Registered under `NONE`, the fallback key. Every capability succeeds
//! without doing anything, so a selector that falls back here keeps the
//! application running with features silently disabled.
//!
//! | Capability | Behavior |
//! |------------|----------|
//! | Provider | Ready immediately |
//! | Auth | Never signs in |
//! | Analytics | Drops events |
//! | Data Store | Always empty |
//! | Offerwall | Code -1 |
//!
//! The null backend provides no ads; ad selection falls through to the
//! selector's no-implementation error.

pub mod provider;
pub mod services;

pub use provider::NullProvider;
pub use services::{NullAnalytics, NullAuth, NullDataStore, NullOfferwall};

use mbk_application::registry::{BACKENDS, BackendEntry, BackendEntryConfig, ProviderRegistryBuilder};
use mbk_domain::constants::KEY_NONE;
use mbk_domain::error::Result;
use std::sync::Arc;

fn register_null_backend(
    builder: &mut ProviderRegistryBuilder,
    config: &BackendEntryConfig,
) -> Result<()> {
    let key = config.key.clone();
    builder
        .register_provider(key.clone(), Arc::new(NullProvider::new(key.clone())))?
        .register_auth(key.clone(), Arc::new(NullAuth::new(key.clone())))?
        .register_analytics(key.clone(), Arc::new(NullAnalytics::new(key.clone())))?
        .register_data_store(key.clone(), Arc::new(NullDataStore::new(key.clone())))?
        .register_offerwall(key.clone(), Arc::new(NullOfferwall::new(key)))?;
    Ok(())
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(BACKENDS)]
static NULL_BACKEND: BackendEntry = BackendEntry {
    key: KEY_NONE,
    description: "No-op fallback backend (ready immediately, stores nothing)",
    register: register_null_backend,
};

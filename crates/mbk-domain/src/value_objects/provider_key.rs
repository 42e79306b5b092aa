//! Provider keys
//!
//! Opaque identifiers distinguishing concrete backend implementations.

use crate::constants::{KEY_ADX, KEY_FIREBASE, KEY_NONE, KEY_POINTPUB, KEY_SIMULATED};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier selecting which concrete implementation of a capability to use
///
/// Keys are compared verbatim; `"adx"` and `"ADX"` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderKey(String);

impl ProviderKey {
    /// Create a key from any string
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The well-known fallback sentinel
    pub fn none() -> Self {
        Self::new(KEY_NONE)
    }

    /// Key of the Firebase backend family
    pub fn firebase() -> Self {
        Self::new(KEY_FIREBASE)
    }

    /// Key of the ADX advertising backend family
    pub fn adx() -> Self {
        Self::new(KEY_ADX)
    }

    /// Key of the Pointpub offerwall backend family
    pub fn pointpub() -> Self {
        Self::new(KEY_POINTPUB)
    }

    /// Key of the in-process simulated backend
    pub fn simulated() -> Self {
        Self::new(KEY_SIMULATED)
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the fallback sentinel
    pub fn is_none(&self) -> bool {
        self.0 == KEY_NONE
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ProviderKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for ProviderKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProviderKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Error handling types

use crate::value_objects::{CapabilityKind, ProviderKey};
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Multi-Backend Kit
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// A (kind, key) pair was registered twice while overwrites are rejected
    #[error("Duplicate registration: {kind} implementation already registered under '{key}'")]
    DuplicateKey {
        /// Capability kind of the rejected registration
        kind: CapabilityKind,
        /// Key that was already taken
        key: ProviderKey,
    },

    /// Registry lookup found nothing under the requested key
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Neither the requested key, the fallback key, nor a default is registered
    #[error("No {kind} implementation available: {message}")]
    NoImplementation {
        /// Capability kind that could not be resolved
        kind: CapabilityKind,
        /// Description of what was attempted
        message: String,
    },

    /// A provider's initialize call rejected
    #[error("Initialization of provider '{key}' failed: {message}")]
    Initialization {
        /// Provider that failed
        key: ProviderKey,
        /// Provider-supplied failure detail
        message: String,
    },

    /// Resource load rejected by the vendor layer
    #[error("Load of ad unit '{unit_id}' failed with provider code {code}")]
    LoadFailed {
        /// Ad unit identifier
        unit_id: String,
        /// Vendor error code
        code: i32,
    },

    /// A suspending operation observed its cancellation token
    #[error("Operation cancelled: {operation}")]
    Cancelled {
        /// Operation that was cancelled
        operation: String,
    },

    /// A suspending operation exceeded its deadline
    #[error("Operation timed out after {elapsed_ms}ms: {operation}")]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Elapsed time in milliseconds
        elapsed_ms: u64,
    },

    /// The owning provider has not reported ready
    #[error("Provider '{key}' is not ready")]
    NotReady {
        /// Provider that is not ready
        key: ProviderKey,
    },

    /// A show is already waiting for its completion signals
    #[error("Ad unit '{unit_id}' already has a pending show")]
    ShowPending {
        /// Ad unit identifier
        unit_id: String,
    },

    /// The controller was disposed
    #[error("Ad unit '{unit_id}' has been disposed")]
    Disposed {
        /// Ad unit identifier
        unit_id: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication-related error
    #[error("Authentication error: {message}")]
    Authentication {
        /// Description of the authentication error
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

// Registry and selection error creation methods
impl Error {
    /// Create a duplicate registration error
    pub fn duplicate_key(kind: CapabilityKind, key: ProviderKey) -> Self {
        Self::DuplicateKey { kind, key }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a no implementation error
    pub fn no_implementation<S: Into<String>>(kind: CapabilityKind, message: S) -> Self {
        Self::NoImplementation {
            kind,
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

// Lifecycle error creation methods
impl Error {
    /// Create an initialization error for a provider
    pub fn initialization<S: Into<String>>(key: ProviderKey, message: S) -> Self {
        Self::Initialization {
            key,
            message: message.into(),
        }
    }

    /// Create a load failure carrying the vendor error code
    pub fn load_failed<S: Into<String>>(unit_id: S, code: i32) -> Self {
        Self::LoadFailed {
            unit_id: unit_id.into(),
            code,
        }
    }

    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(operation: S) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, elapsed: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create a not-ready error
    pub fn not_ready(key: ProviderKey) -> Self {
        Self::NotReady { key }
    }

    /// Create a pending-show rejection
    pub fn show_pending<S: Into<String>>(unit_id: S) -> Self {
        Self::ShowPending {
            unit_id: unit_id.into(),
        }
    }

    /// Create a disposed error
    pub fn disposed<S: Into<String>>(unit_id: S) -> Self {
        Self::Disposed {
            unit_id: unit_id.into(),
        }
    }

    /// Whether this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

// Configuration and infrastructure error creation methods
impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an authentication error
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

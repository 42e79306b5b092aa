//! Domain constants

/// Fallback sentinel key substituted when a requested key is unregistered
pub const KEY_NONE: &str = "NONE";

/// Firebase backend family key
pub const KEY_FIREBASE: &str = "FIREBASE";

/// ADX advertising backend family key
pub const KEY_ADX: &str = "ADX";

/// Pointpub offerwall backend family key
pub const KEY_POINTPUB: &str = "POINTPUB";

/// In-process simulated backend key
pub const KEY_SIMULATED: &str = "SIMULATED";

/// Capacity of the backend event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Vendor error code used when a load is rejected without a vendor code
pub const LOAD_ERROR_UNKNOWN: i32 = -1;

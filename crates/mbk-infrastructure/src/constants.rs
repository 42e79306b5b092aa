//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `mbk_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "mbk.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "mbk";

/// Environment variable prefix for configuration (`MBK__SECTION__KEY`)
pub const CONFIG_ENV_PREFIX: &str = "MBK";

/// Separator between the prefix and nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "MBK_LOG";

/// File stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "mbk";

// ============================================================================
// BACKEND CONSTANTS
// ============================================================================

/// Backends enabled when configuration names none, in registration order
pub const DEFAULT_ENABLED_BACKENDS: [&str; 2] = ["SIMULATED", "NONE"];

/// Default bound on provider initialization, in seconds (0 disables it)
pub const DEFAULT_INIT_TIMEOUT_SECS: u64 = 30;

/// Vendor test banner unit id
pub const DEFAULT_BANNER_UNIT_ID: &str = "test-banner";

/// Vendor test interstitial unit id
pub const DEFAULT_INTERSTITIAL_UNIT_ID: &str = "test-interstitial";

/// Vendor test rewarded unit id
pub const DEFAULT_REWARDED_UNIT_ID: &str = "test-rewarded";

// ============================================================================
// SHUTDOWN CONSTANTS
// ============================================================================

/// Time allowed for tracked background tasks to finish on shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 5;

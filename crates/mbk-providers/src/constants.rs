//! Backend Constants
//!
//! Constants specific to backend implementations. Domain-wide constants such
//! as the well-known provider keys live in `mbk_domain::constants`.

// ============================================================================
// NULL BACKEND CONSTANTS
// ============================================================================

/// Participation code reported by the null offerwall
pub const NULL_OFFERWALL_CODE: i32 = -1;

/// Payload reported by the null offerwall
pub const NULL_OFFERWALL_DATA: &str = "offerwall unavailable";

// ============================================================================
// SIMULATED BACKEND SETTING NAMES
// ============================================================================

/// Extra setting: initialize duration in milliseconds
pub const SIMULATED_INIT_DELAY_MS: &str = "init_delay_ms";

/// Extra setting: delay between initialize completing and readiness
pub const SIMULATED_READY_DELAY_MS: &str = "ready_delay_ms";

/// Extra setting: failure message returned by initialize
pub const SIMULATED_FAIL_INIT: &str = "fail_init";

/// Extra setting: ad load latency in milliseconds
pub const SIMULATED_LOAD_DELAY_MS: &str = "load_delay_ms";

/// Extra setting: ad show latency in milliseconds
pub const SIMULATED_SHOW_DELAY_MS: &str = "show_delay_ms";

/// Extra setting: vendor code every ad load fails with
pub const SIMULATED_LOAD_FAILURE_CODE: &str = "load_failure_code";

/// Extra setting: eCPM reported on paid impressions
pub const SIMULATED_ECPM: &str = "ecpm";

// ============================================================================
// SIMULATED BACKEND DEFAULTS
// ============================================================================

/// Default initialize duration in milliseconds
pub const SIMULATED_DEFAULT_INIT_DELAY_MS: u64 = 50;

/// Default readiness delay in milliseconds
pub const SIMULATED_DEFAULT_READY_DELAY_MS: u64 = 0;

/// Default ad load latency in milliseconds
pub const SIMULATED_DEFAULT_LOAD_DELAY_MS: u64 = 100;

/// Default ad show latency in milliseconds
pub const SIMULATED_DEFAULT_SHOW_DELAY_MS: u64 = 200;

/// Default eCPM reported on paid impressions
pub const SIMULATED_DEFAULT_ECPM: f64 = 4_000.0;

/// Points granted per offerwall session
pub const SIMULATED_OFFERWALL_REWARD_POINTS: u32 = 100;

/// Minimum password length accepted by simulated sign-up
pub const SIMULATED_MIN_PASSWORD_LEN: usize = 6;

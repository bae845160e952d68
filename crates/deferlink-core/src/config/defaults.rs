//! Default configuration values.

/// Default candidate time-to-live (hours).
pub const DEFAULT_TTL_HOURS: u64 = 48;

/// Default interval between expired-candidate cleanup runs (seconds).
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 1800;

/// Default interval between weight-adaptation runs (seconds).
pub const DEFAULT_ADAPTATION_INTERVAL_SECS: u64 = 3600;

/// Default confidence floor for adaptation feedback samples.
pub const DEFAULT_ADAPTATION_CONFIDENCE_FLOOR: f64 = 0.7;

/// Default share of the proposed weights blended in per adaptation cycle.
pub const DEFAULT_ADAPTATION_SMOOTHING: f64 = 0.2;

/// Default aggregate risk score above which the transport layer should
/// reject a request.
pub const DEFAULT_RISK_THRESHOLD: f64 = 0.8;

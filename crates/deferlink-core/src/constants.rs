/// DeferLink system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard upper bound on a candidate's time-to-live (7 days).
pub const MAX_TTL_HOURS: u64 = 168;

/// Maximum number of open candidates loaded per resolution attempt.
pub const MAX_CANDIDATE_POOL: usize = 50;

/// Maximum number of resolved rows pulled per weight-adaptation cycle.
pub const MAX_ADAPTATION_SAMPLES: usize = 1000;

/// Minimum number of qualifying samples before adaptation touches the weights.
pub const MIN_ADAPTATION_SAMPLES: usize = 10;

/// Tolerance for weight-vector normalization checks.
pub const WEIGHT_SUM_EPSILON: f64 = 1e-6;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Background-cycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Interval between expired-candidate cleanup runs (seconds).
    /// The similarity memo caches are cleared on the same cycle.
    pub cleanup_interval_secs: u64,
    /// Interval between weight-adaptation runs (seconds).
    pub adaptation_interval_secs: u64,
    /// When false, the adaptation cycle runs but leaves weights untouched.
    pub auto_optimize_weights: bool,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: defaults::DEFAULT_CLEANUP_INTERVAL_SECS,
            adaptation_interval_secs: defaults::DEFAULT_ADAPTATION_INTERVAL_SECS,
            auto_optimize_weights: false,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Risk heuristic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Whether the risk heuristic is evaluated at all.
    pub enabled: bool,
    /// Aggregate risk above which the transport layer should reject.
    pub risk_threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            risk_threshold: defaults::DEFAULT_RISK_THRESHOLD,
        }
    }
}

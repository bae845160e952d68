use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Weight-adaptation (feedback loop) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptationConfig {
    /// Minimum qualifying resolved matches before weights are touched.
    pub min_samples: usize,
    /// Maximum resolved matches pulled per cycle.
    pub history_limit: usize,
    /// Only resolved matches above this stored confidence feed adaptation.
    pub confidence_floor: f64,
    /// Share of the proposed vector blended in: new = (1-s)*old + s*proposed.
    pub smoothing: f64,
}

impl Default for AdaptationConfig {
    fn default() -> Self {
        Self {
            min_samples: constants::MIN_ADAPTATION_SAMPLES,
            history_limit: constants::MAX_ADAPTATION_SAMPLES,
            confidence_floor: defaults::DEFAULT_ADAPTATION_CONFIDENCE_FLOOR,
            smoothing: defaults::DEFAULT_ADAPTATION_SMOOTHING,
        }
    }
}

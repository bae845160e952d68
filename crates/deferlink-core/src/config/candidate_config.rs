use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Candidate lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// TTL applied when the touchpoint does not request one (hours).
    pub default_ttl_hours: u64,
    /// Hard cap on any requested TTL (hours).
    pub max_ttl_hours: u64,
    /// Maximum number of open candidates considered per resolution attempt.
    pub candidate_limit: usize,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            default_ttl_hours: defaults::DEFAULT_TTL_HOURS,
            max_ttl_hours: constants::MAX_TTL_HOURS,
            candidate_limit: constants::MAX_CANDIDATE_POOL,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Aggregates computed from the candidate store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_candidates: u64,
    /// Open, unexpired candidates.
    pub active_candidates: u64,
    pub resolved_candidates: u64,
    /// resolved / total, as a percentage.
    pub success_rate: f64,
    /// Mean stored match confidence over resolved candidates.
    pub average_confidence: f64,
    /// Candidates created in the trailing hour.
    pub created_last_hour: u64,
}

/// In-process counters kept by the resolver since startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatcherStats {
    pub total_requests: u64,
    pub successful_matches: u64,
    pub failed_matches: u64,
    /// Running average of accepted-match confidence.
    pub average_confidence: f64,
}

/// Combined statistics exposed to the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    #[serde(flatten)]
    pub store: StoreStats,
    pub matcher: MatcherStats,
}

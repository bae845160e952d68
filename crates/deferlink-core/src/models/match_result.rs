use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Confidence, Feature, WeightVector};

/// Why a resolution attempt produced no match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchReason {
    /// The candidate pool was empty.
    NoCandidates,
    /// The best final score fell below the dynamic threshold.
    BelowThreshold,
    /// Another resolution call won the conditional write first.
    LostRace,
}

/// Per-feature decomposition of a match score. Persisted alongside the
/// resolved candidate and replayed by the weight-adaptation cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchBreakdown {
    /// Raw comparator output per feature, each in [0, 1].
    pub component_scores: BTreeMap<Feature, f64>,
    /// Weight vector in effect when the score was computed.
    pub weights_used: WeightVector,
    /// Weight-normalized weighted average of the component scores.
    pub weighted_score: f64,
    /// Temporal plausibility multiplier in [0, 1].
    pub temporal_score: f64,
    /// weighted_score * temporal_score.
    pub final_score: f64,
}

impl MatchBreakdown {
    /// Serialize for persistence with the resolved candidate.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a persisted breakdown.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub is_match: bool,
    /// Best final score seen, whether or not it cleared the threshold.
    pub confidence: Confidence,
    /// Identity of the winning candidate, when matched.
    pub candidate_id: Option<String>,
    /// Decomposition of the best-scoring comparison, absent only when the
    /// pool was empty.
    pub breakdown: Option<MatchBreakdown>,
    /// Populated iff `is_match` is false.
    pub reason: Option<NoMatchReason>,
}

impl MatchResult {
    /// A non-match with the given reason.
    pub fn no_match(reason: NoMatchReason) -> Self {
        Self {
            is_match: false,
            confidence: Confidence::new(0.0),
            candidate_id: None,
            breakdown: None,
            reason: Some(reason),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Action suggested by the risk heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRecommendation {
    BlockRequest,
}

/// Output of the abuse/risk heuristic. Consumed by the transport layer
/// to gate requests before they reach the resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Aggregate risk in [0, 1].
    pub risk_score: f64,
    /// Human-readable reasons behind the score.
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<RiskRecommendation>,
    /// Candidates created from the requester's address in the trailing hour.
    pub requests_last_hour: u64,
}

impl RiskAssessment {
    /// A zero-risk assessment with no findings.
    pub fn clear() -> Self {
        Self {
            risk_score: 0.0,
            risk_factors: Vec::new(),
            recommendations: Vec::new(),
            requests_last_hour: 0,
        }
    }
}

//! Data model: candidates, fingerprints, match results, weights, risk,
//! and statistics.

mod candidate;
mod confidence;
mod fingerprint;
mod match_result;
mod risk;
mod stats;
mod weights;

pub use candidate::{CandidateRequest, CandidateVisit};
pub use confidence::Confidence;
pub use fingerprint::QueryFingerprint;
pub use match_result::{MatchBreakdown, MatchResult, NoMatchReason};
pub use risk::{RiskAssessment, RiskRecommendation};
pub use stats::{EngineStats, MatcherStats, StoreStats};
pub use weights::{Feature, WeightVector};

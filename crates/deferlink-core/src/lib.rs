//! # deferlink-core
//!
//! Foundation crate for the DeferLink attribution engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{
    AdaptationConfig, CandidateConfig, DeferlinkConfig, MaintenanceConfig, RiskConfig,
};
pub use errors::{DeferlinkError, DeferlinkResult};
pub use models::{
    CandidateRequest, CandidateVisit, Confidence, EngineStats, Feature, MatchBreakdown,
    MatchResult, MatcherStats, NoMatchReason, QueryFingerprint, RiskAssessment,
    RiskRecommendation, StoreStats, WeightVector,
};
pub use traits::{CandidateStore, ResolvedOutcome};

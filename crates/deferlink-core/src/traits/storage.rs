use crate::errors::DeferlinkResult;
use crate::models::{CandidateVisit, Confidence, StoreStats};

/// A resolved candidate's persisted outcome, replayed by weight adaptation.
#[derive(Debug, Clone)]
pub struct ResolvedOutcome {
    /// Serialized `MatchBreakdown`.
    pub details: String,
    /// Confidence stored when the candidate was resolved.
    pub confidence: f64,
}

/// Storage contract for the candidate pool.
///
/// `conditional_resolve` is the one operation with real concurrency
/// semantics: the open -> resolved transition must be a single atomic
/// conditional write, so at most one caller wins per candidate.
pub trait CandidateStore: Send + Sync {
    // --- Candidates ---
    fn insert_candidate(&self, candidate: &CandidateVisit) -> DeferlinkResult<()>;
    /// Lookup by id, excluding expired rows.
    fn get_candidate(&self, id: &str) -> DeferlinkResult<Option<CandidateVisit>>;
    /// Up to `limit` open, unexpired candidates, newest first.
    fn open_unexpired_candidates(&self, limit: usize) -> DeferlinkResult<Vec<CandidateVisit>>;
    /// Flip a candidate to resolved iff it is still open and unexpired.
    /// Returns false when the row was already resolved, expired, or gone —
    /// a lost race, not an error.
    fn conditional_resolve(
        &self,
        id: &str,
        confidence: Confidence,
        details: &str,
    ) -> DeferlinkResult<bool>;

    // --- Maintenance ---
    /// Delete rows past their expiry. Returns the count removed.
    fn delete_expired(&self) -> DeferlinkResult<usize>;

    // --- Feedback & observability ---
    /// Most recent resolved outcomes with stored confidence above
    /// `threshold`, newest first, up to `limit`.
    fn resolved_with_confidence_above(
        &self,
        threshold: f64,
        limit: usize,
    ) -> DeferlinkResult<Vec<ResolvedOutcome>>;
    /// Candidates created from `ip` in the trailing hour.
    fn requests_last_hour(&self, ip: &str) -> DeferlinkResult<u64>;
    fn stats(&self) -> DeferlinkResult<StoreStats>;
    /// Best-effort analytics event. Implementations log failures instead
    /// of surfacing them.
    fn record_event(
        &self,
        candidate_id: Option<&str>,
        event_type: &str,
        metadata: &serde_json::Value,
    ) -> DeferlinkResult<()>;
}

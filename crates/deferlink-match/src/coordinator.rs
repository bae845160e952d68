//! Resolution coordinator.
//!
//! Owns the scorer, the live weight vector, and the in-process counters.
//! Orchestrates candidate creation, pool retrieval, scoring, and the
//! atomic open -> resolved transition. The weight vector follows a
//! single-writer discipline: only the adaptation cycle replaces it, and
//! always wholesale via an `Arc` swap so scoring calls never observe a
//! half-updated vector.

use std::sync::{Arc, Mutex, RwLock};

use chrono::{Duration, Utc};
use uuid::Uuid;

use deferlink_core::{
    CandidateRequest, CandidateVisit, Confidence, DeferlinkConfig, DeferlinkResult, EngineStats,
    MatchResult, MatcherStats, NoMatchReason, QueryFingerprint, RiskAssessment, WeightVector,
};

use crate::scoring::MatchScorer;
use crate::{adaptation, risk};

/// Longest user-agent prefix kept in analytics event metadata.
const EVENT_UA_PREFIX: usize = 100;

pub struct Resolver {
    store: Arc<dyn deferlink_core::CandidateStore>,
    scorer: MatchScorer,
    weights: RwLock<Arc<WeightVector>>,
    matcher_stats: Mutex<MatcherStats>,
    config: DeferlinkConfig,
}

impl Resolver {
    pub fn new(store: Arc<dyn deferlink_core::CandidateStore>, config: DeferlinkConfig) -> Self {
        Self {
            store,
            scorer: MatchScorer::new(),
            weights: RwLock::new(Arc::new(WeightVector::default())),
            matcher_stats: Mutex::new(MatcherStats::default()),
            config,
        }
    }

    /// Register a browser-side visit as an open candidate. Returns the
    /// candidate's opaque id.
    pub fn create_candidate(&self, request: CandidateRequest) -> DeferlinkResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let ttl_hours = request
            .ttl_hours
            .unwrap_or(self.config.candidates.default_ttl_hours)
            .clamp(1, self.config.candidates.max_ttl_hours);

        let candidate = CandidateVisit {
            id: id.clone(),
            promo_id: request.promo_id,
            domain: request.domain,
            user_agent: request.user_agent,
            timezone: request.timezone,
            language: request.language,
            screen_size: request.screen_size,
            model: request.model,
            idfv: request.idfv,
            ip_address: request.ip_address,
            created_at: now,
            expires_at: now + Duration::hours(ttl_hours as i64),
            is_resolved: false,
            resolved_at: None,
            match_confidence: None,
            match_details: None,
        };
        self.store.insert_candidate(&candidate)?;

        let ua_prefix: String = candidate
            .user_agent
            .as_deref()
            .unwrap_or("")
            .chars()
            .take(EVENT_UA_PREFIX)
            .collect();
        self.store.record_event(
            Some(&id),
            "candidate_created",
            &serde_json::json!({
                "promo_id": candidate.promo_id,
                "domain": candidate.domain,
                "ttl_hours": ttl_hours,
                "user_agent": ua_prefix,
            }),
        )?;

        tracing::info!(candidate_id = %id, promo_id = %candidate.promo_id, ttl_hours, "candidate created");
        Ok(id)
    }

    /// Match a query fingerprint against the open candidate pool and, on
    /// acceptance, atomically resolve the winner.
    ///
    /// A lost resolution race is reported as a no-match, never an error.
    pub fn resolve(&self, fingerprint: &QueryFingerprint) -> DeferlinkResult<MatchResult> {
        self.with_stats(|s| s.total_requests += 1);

        let candidates = self
            .store
            .open_unexpired_candidates(self.config.candidates.candidate_limit)?;
        let weights = self.weights_snapshot();
        let result = self
            .scorer
            .find_best_match(fingerprint, &candidates, &weights, Utc::now());

        if !result.is_match {
            self.with_stats(|s| s.failed_matches += 1);
            tracing::debug!(reason = ?result.reason, "resolution produced no match");
            return Ok(result);
        }

        // is_match implies a winning candidate and breakdown exist.
        let (Some(candidate_id), Some(breakdown)) = (&result.candidate_id, &result.breakdown)
        else {
            self.with_stats(|s| s.failed_matches += 1);
            return Ok(MatchResult::no_match(NoMatchReason::BelowThreshold));
        };
        let details = breakdown.to_json()?;

        let won = self
            .store
            .conditional_resolve(candidate_id, result.confidence, &details)?;
        if !won {
            // Another caller resolved (or the reaper deleted) the row
            // between the read and the write.
            self.with_stats(|s| s.failed_matches += 1);
            tracing::info!(candidate_id = %candidate_id, "lost resolution race");
            let mut lost = result.clone();
            lost.is_match = false;
            lost.reason = Some(NoMatchReason::LostRace);
            return Ok(lost);
        }

        self.with_stats(|s| {
            s.successful_matches += 1;
            let n = s.successful_matches as f64;
            s.average_confidence =
                (s.average_confidence * (n - 1.0) + result.confidence.value()) / n;
        });
        self.store.record_event(
            Some(candidate_id),
            "candidate_resolved",
            &serde_json::json!({
                "confidence": result.confidence.value(),
                "final_score": breakdown.final_score,
            }),
        )?;
        tracing::info!(candidate_id = %candidate_id, confidence = %result.confidence, "candidate resolved");
        Ok(result)
    }

    /// Resolve a specific candidate on the caller's authority, still
    /// honoring the single-resolution invariant. Returns false when the
    /// candidate was already resolved, expired, or unknown.
    pub fn mark_resolved(
        &self,
        candidate_id: &str,
        confidence: Confidence,
        details: &str,
    ) -> DeferlinkResult<bool> {
        let won = self.store.conditional_resolve(candidate_id, confidence, details)?;
        if won {
            self.store.record_event(
                Some(candidate_id),
                "candidate_resolved",
                &serde_json::json!({ "confidence": confidence.value(), "external": true }),
            )?;
        }
        Ok(won)
    }

    /// Store aggregates plus in-process matcher counters.
    pub fn stats(&self) -> DeferlinkResult<EngineStats> {
        Ok(EngineStats {
            store: self.store.stats()?,
            matcher: self.with_stats(|s| s.clone()),
        })
    }

    pub fn assess_risk(
        &self,
        fingerprint: &QueryFingerprint,
        ip_address: Option<&str>,
    ) -> DeferlinkResult<RiskAssessment> {
        if !self.config.risk.enabled {
            return Ok(RiskAssessment::clear());
        }
        risk::assess(self.store.as_ref(), fingerprint, ip_address)
    }

    /// Delete candidates past expiry. Returns the count removed.
    pub fn cleanup_expired(&self) -> DeferlinkResult<usize> {
        let deleted = self.store.delete_expired()?;
        if deleted > 0 {
            tracing::info!(deleted, "removed expired candidates");
        }
        Ok(deleted)
    }

    /// Recompute weights from resolution history and swap them in.
    /// Returns the vector now in effect.
    pub fn adapt_weights(&self) -> DeferlinkResult<WeightVector> {
        let current = self.weights_snapshot();
        let next = adaptation::adapt_weights(self.store.as_ref(), &self.config.adaptation, &current)?;
        if next != *current {
            self.swap_weights(Arc::new(next.clone()));
        }
        Ok(next)
    }

    /// The weight vector currently in effect.
    pub fn current_weights(&self) -> WeightVector {
        (*self.weights_snapshot()).clone()
    }

    /// Drop all memoized comparator scores.
    pub fn clear_caches(&self) {
        self.scorer.clear_caches();
    }

    // A poisoned lock only means a panic elsewhere; the guarded values
    // are always internally consistent (swapped wholesale / plain
    // counters), so recover the inner value instead of propagating.
    fn weights_snapshot(&self) -> Arc<WeightVector> {
        match self.weights.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn swap_weights(&self, next: Arc<WeightVector>) {
        let mut guard = match self.weights.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
    }

    fn with_stats<T>(&self, f: impl FnOnce(&mut MatcherStats) -> T) -> T {
        let mut guard = match self.matcher_stats.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

//! Scoring engine.
//!
//! Combines the five comparator scores into a weight-normalized average,
//! multiplies by the temporal plausibility factor, and picks the best
//! candidate from a bounded pool. Everything here is pure aside from the
//! similarity caches.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};

use deferlink_core::{
    CandidateVisit, Confidence, Feature, MatchBreakdown, MatchResult, NoMatchReason,
    QueryFingerprint, WeightVector,
};

use crate::caches::SimilarityCaches;
use crate::{compare, policy, quality, temporal};

/// Stateless scorer over a shared pair of similarity caches.
pub struct MatchScorer {
    caches: SimilarityCaches,
}

impl MatchScorer {
    pub fn new() -> Self {
        Self {
            caches: SimilarityCaches::new(),
        }
    }

    /// Drop all memoized comparator scores.
    pub fn clear_caches(&self) {
        self.caches.clear();
    }

    fn component_scores(
        &self,
        candidate: &CandidateVisit,
        query: &QueryFingerprint,
    ) -> BTreeMap<Feature, f64> {
        let mut scores = BTreeMap::new();
        scores.insert(
            Feature::Timezone,
            self.caches
                .timezone_score(candidate.timezone.as_deref(), query.timezone.as_deref()),
        );
        scores.insert(
            Feature::Screen,
            compare::screen::similarity(
                candidate.screen_size.as_deref(),
                query.screen_size.as_deref(),
            ),
        );
        scores.insert(
            Feature::Language,
            compare::language::similarity(candidate.language.as_deref(), query.language.as_deref()),
        );
        scores.insert(
            Feature::Device,
            self.caches
                .device_score(candidate.model.as_deref(), query.model.as_deref()),
        );
        scores.insert(
            Feature::UserAgent,
            compare::user_agent::similarity(
                candidate.user_agent.as_deref(),
                query.user_agent.as_deref(),
            ),
        );
        scores
    }

    /// Weight-normalized weighted average of the comparator scores,
    /// plus the per-feature decomposition.
    pub fn compute_score(
        &self,
        candidate: &CandidateVisit,
        query: &QueryFingerprint,
        weights: &WeightVector,
    ) -> (f64, BTreeMap<Feature, f64>) {
        let scores = self.component_scores(candidate, query);

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for (feature, score) in &scores {
            let weight = weights.get(*feature);
            weighted_sum += score * weight;
            weight_total += weight;
        }

        let score = if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            0.0
        };
        (score, scores)
    }

    /// Score every candidate and decide against the dynamic threshold.
    ///
    /// Candidates are expected newest-first; ties on the final score keep
    /// the first seen, so recency breaks ties.
    pub fn find_best_match(
        &self,
        query: &QueryFingerprint,
        candidates: &[CandidateVisit],
        weights: &WeightVector,
        now: DateTime<Utc>,
    ) -> MatchResult {
        let Some((first, rest)) = candidates.split_first() else {
            return MatchResult::no_match(NoMatchReason::NoCandidates);
        };

        let evaluate = |candidate: &CandidateVisit| {
            let (weighted_score, component_scores) = self.compute_score(candidate, query, weights);
            let temporal_score = temporal::plausibility(Some(candidate.created_at), now);
            let final_score = weighted_score * temporal_score;
            MatchBreakdown {
                component_scores,
                weights_used: weights.clone(),
                weighted_score,
                temporal_score,
                final_score,
            }
        };

        // Seed with the first candidate; strict-greater keeps the
        // earliest-seen (newest) candidate on ties.
        let mut candidate = first;
        let mut breakdown = evaluate(first);
        for contender in rest {
            let contender_breakdown = evaluate(contender);
            if contender_breakdown.final_score > breakdown.final_score {
                candidate = contender;
                breakdown = contender_breakdown;
            }
        }
        let final_score = breakdown.final_score;

        let threshold = policy::dynamic_threshold(quality::assess(query), now.hour());
        let is_match = final_score >= threshold;

        MatchResult {
            is_match,
            confidence: Confidence::new(final_score),
            candidate_id: Some(candidate.id.clone()),
            breakdown: Some(breakdown),
            reason: (!is_match).then_some(NoMatchReason::BelowThreshold),
        }
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn candidate(id: &str, created_at: DateTime<Utc>) -> CandidateVisit {
        CandidateVisit {
            id: id.to_string(),
            promo_id: "SUMMER25".to_string(),
            domain: "shop.example.com".to_string(),
            user_agent: Some("Mozilla/5.0 (iPhone; CPU iPhone OS 16_0) AppleWebKit Safari".into()),
            timezone: Some("Europe/Moscow".into()),
            language: Some("ru_RU".into()),
            screen_size: Some("390x844".into()),
            model: Some("iPhone14,2".into()),
            idfv: None,
            ip_address: None,
            created_at,
            expires_at: created_at + Duration::hours(48),
            is_resolved: false,
            resolved_at: None,
            match_confidence: None,
            match_details: None,
        }
    }

    fn matching_query() -> QueryFingerprint {
        QueryFingerprint {
            timezone: Some("Europe/Moscow".into()),
            language: Some("ru_RU".into()),
            screen_size: Some("390x844".into()),
            model: Some("iPhone14,2".into()),
            user_agent: Some("Mozilla/5.0 (iPhone; CPU iPhone OS 16_0) AppleWebKit Safari".into()),
        }
    }

    #[test]
    fn identical_fingerprint_in_install_window_matches() {
        let scorer = MatchScorer::new();
        let created = Utc::now() - Duration::seconds(120);
        let result = scorer.find_best_match(
            &matching_query(),
            &[candidate("c1", created)],
            &WeightVector::default(),
            Utc::now(),
        );
        assert!(result.is_match);
        assert!((result.confidence.value() - 1.0).abs() < 1e-9);
        let breakdown = result.breakdown.unwrap();
        assert_eq!(breakdown.temporal_score, 1.0);
        for score in breakdown.component_scores.values() {
            assert_eq!(*score, 1.0);
        }
    }

    #[test]
    fn wrong_timezone_drops_below_threshold() {
        let scorer = MatchScorer::new();
        // Pinned to business hours: the mismatch scores exactly 0.65,
        // which clears the loosened off-hours threshold but not the
        // business-hours one of 0.70.
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let created = now - Duration::seconds(120);
        let mut query = matching_query();
        query.timezone = Some("America/New_York".into());
        let result = scorer.find_best_match(
            &query,
            &[candidate("c1", created)],
            &WeightVector::default(),
            now,
        );
        assert!(!result.is_match);
        assert_eq!(result.reason, Some(NoMatchReason::BelowThreshold));
        // The best candidate is still reported for observability.
        assert_eq!(result.candidate_id.as_deref(), Some("c1"));
        assert!(result.confidence.value() < 0.70);
    }

    #[test]
    fn instantaneous_query_fails_despite_perfect_attributes() {
        let scorer = MatchScorer::new();
        let created = Utc::now() - Duration::seconds(5);
        let result = scorer.find_best_match(
            &matching_query(),
            &[candidate("c1", created)],
            &WeightVector::default(),
            Utc::now(),
        );
        assert!(!result.is_match);
        let breakdown = result.breakdown.unwrap();
        assert_eq!(breakdown.temporal_score, 0.2);
        assert!((breakdown.weighted_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_pool_reports_no_candidates() {
        let scorer = MatchScorer::new();
        let result = scorer.find_best_match(
            &matching_query(),
            &[],
            &WeightVector::default(),
            Utc::now(),
        );
        assert!(!result.is_match);
        assert_eq!(result.reason, Some(NoMatchReason::NoCandidates));
        assert!(result.breakdown.is_none());
    }

    #[test]
    fn best_candidate_wins_and_ties_keep_the_newest() {
        let scorer = MatchScorer::new();
        let now = Utc::now();
        let newest = candidate("newest", now - Duration::seconds(60));
        let older = candidate("older", now - Duration::seconds(90));
        let mut worst = candidate("worst", now - Duration::seconds(70));
        worst.timezone = Some("Asia/Tokyo".into());

        // Newest-first ordering, as the store supplies it.
        let result = scorer.find_best_match(
            &matching_query(),
            &[newest, worst, older],
            &WeightVector::default(),
            now,
        );
        assert!(result.is_match);
        assert_eq!(result.candidate_id.as_deref(), Some("newest"));
    }

    #[test]
    fn compute_score_guards_a_zero_weight_total() {
        let scorer = MatchScorer::new();
        let zero = WeightVector {
            timezone: 0.0,
            screen: 0.0,
            language: 0.0,
            device: 0.0,
            user_agent: 0.0,
        };
        let created = Utc::now();
        let (score, _) = scorer.compute_score(&candidate("c1", created), &matching_query(), &zero);
        assert_eq!(score, 0.0);
    }
}

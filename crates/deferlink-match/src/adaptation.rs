//! Feedback-driven weight adaptation.
//!
//! Replays the breakdowns of recent high-confidence resolved matches,
//! accumulates per-feature performance, and blends the normalized result
//! into the current weights with exponential smoothing. Best-effort
//! tuning, not an online learner.

use deferlink_core::{
    AdaptationConfig, CandidateStore, DeferlinkResult, Feature, MatchBreakdown, WeightVector,
};

/// Compute the next weight vector from resolution history.
///
/// Returns `current` unchanged when fewer than `min_samples` qualifying
/// rows exist. Rows whose stored breakdown fails to decode are skipped
/// and logged, never fatal to the cycle.
pub fn adapt_weights(
    store: &dyn CandidateStore,
    config: &AdaptationConfig,
    current: &WeightVector,
) -> DeferlinkResult<WeightVector> {
    let outcomes =
        store.resolved_with_confidence_above(config.confidence_floor, config.history_limit)?;
    if outcomes.len() < config.min_samples {
        tracing::debug!(
            samples = outcomes.len(),
            min_samples = config.min_samples,
            "not enough resolved matches, leaving weights untouched"
        );
        return Ok(current.clone());
    }

    let mut performance = WeightVector {
        timezone: 0.0,
        screen: 0.0,
        language: 0.0,
        device: 0.0,
        user_agent: 0.0,
    };
    let mut counted = 0usize;

    for outcome in &outcomes {
        let breakdown = match MatchBreakdown::from_json(&outcome.details) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed match breakdown");
                continue;
            }
        };
        for (feature, score) in &breakdown.component_scores {
            let prev = performance.get(*feature);
            performance.set(*feature, prev + score * outcome.confidence);
        }
        counted += 1;
    }

    if counted == 0 {
        return Ok(current.clone());
    }
    for feature in Feature::ALL {
        performance.set(feature, performance.get(feature) / counted as f64);
    }

    let proposed = performance.normalized();

    // Exponential smoothing, then re-normalize to absorb rounding.
    let mut blended = current.clone();
    for feature in Feature::ALL {
        blended.set(
            feature,
            (1.0 - config.smoothing) * current.get(feature)
                + config.smoothing * proposed.get(feature),
        );
    }
    let next = blended.normalized();

    tracing::info!(
        samples = counted,
        timezone = next.timezone,
        screen = next.screen,
        language = next.language,
        device = next.device,
        user_agent = next.user_agent,
        "adapted feature weights"
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use deferlink_core::{
        CandidateVisit, Confidence, DeferlinkResult, ResolvedOutcome, StoreStats,
    };

    /// In-memory store stub serving canned resolution history.
    struct HistoryStore {
        outcomes: Mutex<Vec<ResolvedOutcome>>,
    }

    impl HistoryStore {
        fn with_outcomes(outcomes: Vec<ResolvedOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
            }
        }
    }

    impl CandidateStore for HistoryStore {
        fn insert_candidate(&self, _: &CandidateVisit) -> DeferlinkResult<()> {
            Ok(())
        }
        fn get_candidate(&self, _: &str) -> DeferlinkResult<Option<CandidateVisit>> {
            Ok(None)
        }
        fn open_unexpired_candidates(&self, _: usize) -> DeferlinkResult<Vec<CandidateVisit>> {
            Ok(Vec::new())
        }
        fn conditional_resolve(&self, _: &str, _: Confidence, _: &str) -> DeferlinkResult<bool> {
            Ok(false)
        }
        fn delete_expired(&self) -> DeferlinkResult<usize> {
            Ok(0)
        }
        fn resolved_with_confidence_above(
            &self,
            threshold: f64,
            limit: usize,
        ) -> DeferlinkResult<Vec<ResolvedOutcome>> {
            let outcomes = self.outcomes.lock().unwrap();
            Ok(outcomes
                .iter()
                .filter(|o| o.confidence > threshold)
                .take(limit)
                .cloned()
                .collect())
        }
        fn requests_last_hour(&self, _: &str) -> DeferlinkResult<u64> {
            Ok(0)
        }
        fn stats(&self) -> DeferlinkResult<StoreStats> {
            Ok(StoreStats::default())
        }
        fn record_event(
            &self,
            _: Option<&str>,
            _: &str,
            _: &serde_json::Value,
        ) -> DeferlinkResult<()> {
            Ok(())
        }
    }

    fn breakdown_json(timezone: f64, device: f64) -> String {
        let mut component_scores = BTreeMap::new();
        component_scores.insert(Feature::Timezone, timezone);
        component_scores.insert(Feature::Screen, 0.9);
        component_scores.insert(Feature::Language, 0.9);
        component_scores.insert(Feature::Device, device);
        component_scores.insert(Feature::UserAgent, 0.5);
        MatchBreakdown {
            component_scores,
            weights_used: WeightVector::default(),
            weighted_score: 0.9,
            temporal_score: 1.0,
            final_score: 0.9,
        }
        .to_json()
        .unwrap()
    }

    fn outcomes(n: usize, timezone: f64, device: f64) -> Vec<ResolvedOutcome> {
        (0..n)
            .map(|_| ResolvedOutcome {
                details: breakdown_json(timezone, device),
                confidence: 0.9,
            })
            .collect()
    }

    #[test]
    fn too_few_samples_is_a_no_op() {
        let store = HistoryStore::with_outcomes(outcomes(9, 1.0, 0.1));
        let current = WeightVector::default();
        let next = adapt_weights(&store, &AdaptationConfig::default(), &current).unwrap();
        assert_eq!(next, current);
    }

    #[test]
    fn adapted_weights_sum_to_one() {
        let store = HistoryStore::with_outcomes(outcomes(50, 1.0, 0.1));
        let next = adapt_weights(
            &store,
            &AdaptationConfig::default(),
            &WeightVector::default(),
        )
        .unwrap();
        assert!((next.sum() - 1.0).abs() <= 1e-6, "sum = {}", next.sum());
    }

    #[test]
    fn weights_shift_toward_observed_performance() {
        // Device consistently underperforms its prior share; user-agent
        // outperforms it. Smoothing moves each weight toward its
        // normalized performance share, so device shrinks and
        // user-agent grows.
        let store = HistoryStore::with_outcomes(outcomes(100, 1.0, 0.05));
        let current = WeightVector::default();
        let next = adapt_weights(&store, &AdaptationConfig::default(), &current).unwrap();
        assert!(next.device < current.device);
        assert!(next.user_agent > current.user_agent);
        // Timezone stays the heaviest feature.
        for feature in Feature::ALL {
            assert!(next.timezone >= next.get(feature));
        }
    }

    #[test]
    fn malformed_breakdowns_are_skipped_not_fatal() {
        let mut rows = outcomes(20, 1.0, 0.5);
        rows.push(ResolvedOutcome {
            details: "not json".to_string(),
            confidence: 0.9,
        });
        let store = HistoryStore::with_outcomes(rows);
        let next = adapt_weights(
            &store,
            &AdaptationConfig::default(),
            &WeightVector::default(),
        )
        .unwrap();
        assert!((next.sum() - 1.0).abs() <= 1e-6);
    }

    #[test]
    fn smoothing_zero_keeps_old_weights() {
        let store = HistoryStore::with_outcomes(outcomes(50, 1.0, 0.1));
        let config = AdaptationConfig {
            smoothing: 0.0,
            ..Default::default()
        };
        let current = WeightVector::default();
        let next = adapt_weights(&store, &config, &current).unwrap();
        for feature in Feature::ALL {
            assert!((next.get(feature) - current.get(feature)).abs() < 1e-9);
        }
    }
}

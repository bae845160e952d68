//! Abuse risk heuristic.
//!
//! Independent of the matching path. Flags abusive query volume and
//! implausibly incomplete fingerprints; the transport layer decides
//! whether to reject above its configured threshold.

use deferlink_core::{
    CandidateStore, DeferlinkResult, QueryFingerprint, RiskAssessment, RiskRecommendation,
};

const VOLUME_WARN: u64 = 50;
const VOLUME_BLOCK: u64 = 100;
const MIN_PLAUSIBLE_UA_LEN: usize = 50;

/// Score a query's abuse risk from request volume and fingerprint shape.
pub fn assess(
    store: &dyn CandidateStore,
    fingerprint: &QueryFingerprint,
    ip_address: Option<&str>,
) -> DeferlinkResult<RiskAssessment> {
    let mut assessment = RiskAssessment::clear();

    if let Some(ip) = ip_address.filter(|s| !s.is_empty()) {
        let requests = store.requests_last_hour(ip)?;
        assessment.requests_last_hour = requests;
        // The two volume tiers stack: past the block threshold both
        // penalties apply.
        if requests > VOLUME_WARN {
            assessment.risk_score += 0.3;
            assessment
                .risk_factors
                .push(format!("elevated request volume: {requests} in the last hour"));
        }
        if requests > VOLUME_BLOCK {
            assessment.risk_score += 0.5;
            assessment
                .risk_factors
                .push(format!("{requests} requests from address in the last hour"));
            assessment
                .recommendations
                .push(RiskRecommendation::BlockRequest);
        }
    }

    let ua_len = fingerprint
        .user_agent
        .as_deref()
        .map(str::len)
        .unwrap_or(0);
    if ua_len < MIN_PLAUSIBLE_UA_LEN {
        assessment.risk_score += 0.2;
        assessment
            .risk_factors
            .push("user-agent absent or implausibly short".to_string());
    }

    let missing_core_attributes = [
        &fingerprint.timezone,
        &fingerprint.language,
        &fingerprint.model,
    ]
    .into_iter()
    .filter(|v| v.as_deref().map_or(true, str::is_empty))
    .count();
    if missing_core_attributes >= 2 {
        assessment.risk_score += 0.3;
        assessment.risk_factors.push(format!(
            "{missing_core_attributes} of 3 core fingerprint attributes missing"
        ));
    }

    assessment.risk_score = assessment.risk_score.clamp(0.0, 1.0);
    Ok(assessment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use deferlink_core::{CandidateVisit, Confidence, ResolvedOutcome, StoreStats};

    struct VolumeStore {
        requests: Mutex<u64>,
    }

    impl VolumeStore {
        fn with_requests(requests: u64) -> Self {
            Self {
                requests: Mutex::new(requests),
            }
        }
    }

    impl CandidateStore for VolumeStore {
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
            _: f64,
            _: usize,
        ) -> DeferlinkResult<Vec<ResolvedOutcome>> {
            Ok(Vec::new())
        }
        fn requests_last_hour(&self, _: &str) -> DeferlinkResult<u64> {
            Ok(*self.requests.lock().unwrap())
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

    fn full_fingerprint() -> QueryFingerprint {
        QueryFingerprint {
            timezone: Some("Europe/Moscow".into()),
            language: Some("ru_RU".into()),
            screen_size: Some("390x844".into()),
            model: Some("iPhone14,2".into()),
            user_agent: Some("Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) Safari".into()),
        }
    }

    #[test]
    fn clean_query_scores_zero() {
        let store = VolumeStore::with_requests(3);
        let assessment = assess(&store, &full_fingerprint(), Some("203.0.113.7")).unwrap();
        assert_eq!(assessment.risk_score, 0.0);
        assert!(assessment.risk_factors.is_empty());
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn elevated_volume_raises_risk() {
        let store = VolumeStore::with_requests(60);
        let assessment = assess(&store, &full_fingerprint(), Some("203.0.113.7")).unwrap();
        assert!((assessment.risk_score - 0.3).abs() < 1e-9);
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn extreme_volume_stacks_both_penalties_and_recommends_blocking() {
        let store = VolumeStore::with_requests(150);
        let assessment = assess(&store, &full_fingerprint(), Some("203.0.113.7")).unwrap();
        // 0.3 (elevated) + 0.5 (block tier).
        assert!((assessment.risk_score - 0.8).abs() < 1e-9);
        assert_eq!(assessment.risk_factors.len(), 2);
        assert_eq!(
            assessment.recommendations,
            vec![RiskRecommendation::BlockRequest]
        );
        assert_eq!(assessment.requests_last_hour, 150);
    }

    #[test]
    fn short_user_agent_and_missing_attributes_stack() {
        let store = VolumeStore::with_requests(0);
        let fp = QueryFingerprint {
            screen_size: Some("390x844".into()),
            user_agent: Some("curl/8".into()),
            ..Default::default()
        };
        let assessment = assess(&store, &fp, None).unwrap();
        // 0.2 (short UA) + 0.3 (timezone, language, model all missing).
        assert!((assessment.risk_score - 0.5).abs() < 1e-9);
        assert_eq!(assessment.risk_factors.len(), 2);
    }

    #[test]
    fn aggregate_risk_is_clamped_to_one() {
        let store = VolumeStore::with_requests(500);
        let assessment = assess(&store, &QueryFingerprint::default(), Some("198.51.100.9")).unwrap();
        assert!(assessment.risk_score <= 1.0);
        assert!(assessment.risk_score >= 0.99);
    }
}

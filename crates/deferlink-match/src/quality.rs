//! Fingerprint quality assessment.
//!
//! Weighted completeness over two reliability tiers. The result feeds
//! the decision threshold only; it never touches the similarity scores.

use deferlink_core::QueryFingerprint;

/// (attribute weight, is the attribute present) pairs for a fingerprint.
fn tiers(fingerprint: &QueryFingerprint) -> [(f64, bool); 5] {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
    [
        // High-reliability attributes.
        (0.30, present(&fingerprint.timezone)),
        (0.25, present(&fingerprint.screen_size)),
        (0.20, present(&fingerprint.language)),
        // Medium-reliability attributes.
        (0.15, present(&fingerprint.model)),
        (0.10, present(&fingerprint.user_agent)),
    ]
}

/// Quality score in [0, 1]: weight mass of the attributes present.
pub fn assess(fingerprint: &QueryFingerprint) -> f64 {
    let entries = tiers(fingerprint);
    let total: f64 = entries.iter().map(|(w, _)| w).sum();
    let present: f64 = entries.iter().filter(|(_, p)| *p).map(|(w, _)| w).sum();
    present / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_fingerprint_scores_one() {
        let fp = QueryFingerprint {
            timezone: Some("Europe/Moscow".into()),
            language: Some("ru_RU".into()),
            screen_size: Some("390x844".into()),
            model: Some("iPhone14,2".into()),
            user_agent: Some("Mozilla/5.0".into()),
        };
        assert!((assess(&fp) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_fingerprint_scores_zero() {
        assert_eq!(assess(&QueryFingerprint::default()), 0.0);
    }

    #[test]
    fn high_reliability_attributes_dominate() {
        let timezone_only = QueryFingerprint {
            timezone: Some("UTC".into()),
            ..Default::default()
        };
        let ua_only = QueryFingerprint {
            user_agent: Some("Mozilla/5.0".into()),
            ..Default::default()
        };
        assert!(assess(&timezone_only) > assess(&ua_only));
        assert!((assess(&timezone_only) - 0.30).abs() < 1e-9);
    }

    #[test]
    fn empty_string_counts_as_absent() {
        let fp = QueryFingerprint {
            timezone: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(assess(&fp), 0.0);
    }
}

//! Timezone similarity.
//!
//! Exact match 1.0, known administrative alias 0.95, same UTC offset via
//! lookup 0.8, otherwise 0.0. Missing on either side is neutral 0.5.

use super::non_empty;

/// Neutral score when either side did not report a timezone.
pub const MISSING: f64 = 0.5;

/// Administrative aliases of the same zone: secondary names that devices
/// report interchangeably with the primary.
const EQUIVALENT_ZONES: &[(&str, &[&str])] = &[
    (
        "Europe/Moscow",
        &["Europe/Volgograd", "Europe/Kirov", "Europe/Simferopol"],
    ),
    (
        "America/New_York",
        &[
            "America/Detroit",
            "America/Kentucky/Louisville",
            "America/Montreal",
        ],
    ),
    (
        "Europe/London",
        &["Europe/Belfast", "Europe/Guernsey", "Europe/Jersey"],
    ),
    (
        "Asia/Shanghai",
        &["Asia/Chongqing", "Asia/Harbin", "Asia/Kashgar"],
    ),
    (
        "America/Los_Angeles",
        &["America/Vancouver", "America/Tijuana"],
    ),
];

/// Standard UTC offsets for zones we see most often.
const UTC_OFFSETS: &[(&str, i32)] = &[
    ("UTC", 0),
    ("Europe/London", 0),
    ("Europe/Moscow", 3),
    ("America/New_York", -5),
    ("America/Los_Angeles", -8),
    ("Asia/Tokyo", 9),
    ("Asia/Shanghai", 8),
];

/// Compare two IANA timezone names.
pub fn similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (non_empty(a), non_empty(b)) else {
        return MISSING;
    };

    if a == b {
        return 1.0;
    }

    for (primary, equivalents) in EQUIVALENT_ZONES {
        let a_in = a == *primary || equivalents.contains(&a);
        let b_in = b == *primary || equivalents.contains(&b);
        if a_in && b_in {
            return 0.95;
        }
    }

    let offset = |zone: &str| {
        UTC_OFFSETS
            .iter()
            .find(|(name, _)| *name == zone)
            .map(|(_, off)| *off)
    };
    if let (Some(oa), Some(ob)) = (offset(a), offset(b)) {
        if oa == ob {
            return 0.8;
        }
    }

    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_one() {
        assert_eq!(similarity(Some("Europe/Moscow"), Some("Europe/Moscow")), 1.0);
    }

    #[test]
    fn administrative_alias_scores_high() {
        assert_eq!(
            similarity(Some("Europe/Moscow"), Some("Europe/Volgograd")),
            0.95
        );
        // Symmetric.
        assert_eq!(
            similarity(Some("Europe/Volgograd"), Some("Europe/Moscow")),
            0.95
        );
    }

    #[test]
    fn same_utc_offset_via_lookup() {
        assert_eq!(similarity(Some("UTC"), Some("Europe/London")), 0.8);
    }

    #[test]
    fn different_zones_score_zero() {
        assert_eq!(
            similarity(Some("Europe/Moscow"), Some("America/New_York")),
            0.0
        );
    }

    #[test]
    fn missing_is_neutral() {
        assert_eq!(similarity(None, Some("Europe/Moscow")), MISSING);
        assert_eq!(similarity(Some(""), Some("Europe/Moscow")), MISSING);
        assert_eq!(similarity(None, None), MISSING);
    }
}

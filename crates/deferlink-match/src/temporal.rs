//! Temporal plausibility.
//!
//! Maps the elapsed time between candidate creation and query arrival to
//! a multiplicative factor in [0, 1]. The 30s-10min window is the
//! typical install-and-open latency and scores a full 1.0; an
//! implausibly instantaneous query (under 10s) is treated as a likely
//! replay or same-session artifact and heavily discounted.

use chrono::{DateTime, Utc};

/// Factor for a candidate without a usable creation timestamp.
pub const MISSING: f64 = 0.8;

/// Plausibility factor for a candidate created at `created_at`, queried
/// at `now`.
pub fn plausibility(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(created_at) = created_at else {
        return MISSING;
    };
    let elapsed = (now - created_at).num_seconds();

    match elapsed {
        s if s < 10 => 0.2,
        s if s < 30 => 0.6,
        s if s <= 600 => 1.0,
        s if s <= 3_600 => 0.9,
        s if s <= 14_400 => 0.7,
        s if s <= 86_400 => 0.4,
        _ => 0.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn factor_at(seconds: i64) -> f64 {
        let now = Utc::now();
        plausibility(Some(now - Duration::seconds(seconds)), now)
    }

    #[test]
    fn install_window_scores_full() {
        assert_eq!(factor_at(30), 1.0);
        assert_eq!(factor_at(120), 1.0);
        assert_eq!(factor_at(600), 1.0);
    }

    #[test]
    fn instantaneous_query_is_discounted() {
        assert_eq!(factor_at(5), 0.2);
        assert_eq!(factor_at(15), 0.6);
    }

    #[test]
    fn factor_decays_with_age() {
        assert_eq!(factor_at(601), 0.9);
        assert_eq!(factor_at(3_601), 0.7);
        assert_eq!(factor_at(14_401), 0.4);
        assert_eq!(factor_at(86_401), 0.1);
    }

    #[test]
    fn missing_timestamp_is_neutral() {
        assert_eq!(plausibility(None, Utc::now()), MISSING);
    }
}

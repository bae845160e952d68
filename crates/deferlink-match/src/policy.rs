//! Decision policy: the dynamic acceptance threshold.
//!
//! Business hours tighten the threshold (peak fraud-risk window) while
//! off-hours loosen it, trading precision for recall. Fingerprint
//! quality shifts it further in either direction.

use deferlink_core::Confidence;

const THRESHOLD_FLOOR: f64 = 0.50;
const THRESHOLD_CEILING: f64 = 0.90;

/// Acceptance threshold for a query of the given fingerprint quality
/// arriving at `local_hour` (0-23).
pub fn dynamic_threshold(quality: f64, local_hour: u32) -> f64 {
    let mut threshold = Confidence::MEDIUM;

    if (9..=21).contains(&local_hour) {
        threshold += 0.05;
    } else {
        threshold -= 0.05;
    }

    if quality > 0.8 {
        threshold -= 0.05;
    } else if quality < 0.4 {
        threshold += 0.10;
    }

    threshold.clamp(THRESHOLD_FLOOR, THRESHOLD_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_hours_tighten() {
        assert!((dynamic_threshold(0.6, 12) - 0.75).abs() < 1e-9);
        assert!((dynamic_threshold(0.6, 3) - 0.65).abs() < 1e-9);
    }

    #[test]
    fn business_window_is_inclusive_of_both_ends() {
        assert!((dynamic_threshold(0.6, 9) - 0.75).abs() < 1e-9);
        assert!((dynamic_threshold(0.6, 21) - 0.75).abs() < 1e-9);
        assert!((dynamic_threshold(0.6, 8) - 0.65).abs() < 1e-9);
        assert!((dynamic_threshold(0.6, 22) - 0.65).abs() < 1e-9);
    }

    #[test]
    fn quality_shifts_the_threshold() {
        // High quality loosens, low quality tightens.
        assert!((dynamic_threshold(0.9, 12) - 0.70).abs() < 1e-9);
        assert!((dynamic_threshold(0.2, 12) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn threshold_stays_clamped() {
        for hour in 0..24 {
            for quality in [0.0, 0.3, 0.5, 0.9, 1.0] {
                let t = dynamic_threshold(quality, hour);
                assert!((THRESHOLD_FLOOR..=THRESHOLD_CEILING).contains(&t));
            }
        }
    }
}

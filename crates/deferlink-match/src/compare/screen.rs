//! Screen geometry similarity.
//!
//! Rotation-tolerant: a swapped width/height pair counts as identical.
//! Tolerance bands absorb system chrome (status bars, notches) that
//! shifts reported dimensions between a browser and a native app.

use super::non_empty;

/// Neutral score for a missing or unparsable geometry.
pub const MISSING: f64 = 0.3;

/// Parse a "WxH"-style string. Accepts `x`, `*`, and `,` separators.
fn parse(screen: &str) -> Option<(u32, u32)> {
    let normalized = screen.replace(['x', 'X', ','], "*");
    let mut parts = normalized.split('*');
    let w: u32 = parts.next()?.trim().parse().ok()?;
    let h: u32 = parts.next()?.trim().parse().ok()?;
    if w == 0 || h == 0 {
        return None;
    }
    Some((w, h))
}

/// Both dimension pairs within `tolerance`, allowing rotation.
fn within_tolerance(a: (u32, u32), b: (u32, u32), tolerance: u32) -> bool {
    let close = |x: u32, y: u32| x.abs_diff(y) <= tolerance;
    (close(a.0, b.0) && close(a.1, b.1)) || (close(a.0, b.1) && close(a.1, b.0))
}

fn aspect_ratio((w, h): (u32, u32)) -> f64 {
    w.max(h) as f64 / w.min(h) as f64
}

/// Compare two screen geometry strings.
pub fn similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (non_empty(a), non_empty(b)) else {
        return MISSING;
    };
    let (Some(a), Some(b)) = (parse(a), parse(b)) else {
        return MISSING;
    };

    if (a.0 == b.0 && a.1 == b.1) || (a.0 == b.1 && a.1 == b.0) {
        return 1.0;
    }
    if within_tolerance(a, b, 60) {
        return 0.95;
    }
    if within_tolerance(a, b, 100) {
        return 0.85;
    }

    let ratio_diff = (aspect_ratio(a) - aspect_ratio(b)).abs();
    if ratio_diff < 0.05 {
        return 0.7;
    }
    if ratio_diff < 0.15 {
        return 0.5;
    }

    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_rotated_match() {
        assert_eq!(similarity(Some("390x844"), Some("390x844")), 1.0);
        assert_eq!(similarity(Some("390x844"), Some("844x390")), 1.0);
    }

    #[test]
    fn separator_variants_parse() {
        assert_eq!(similarity(Some("390*844"), Some("390,844")), 1.0);
        assert_eq!(similarity(Some("390X844"), Some("390x844")), 1.0);
    }

    #[test]
    fn tolerance_bands() {
        // 60 units of system chrome.
        assert_eq!(similarity(Some("390x844"), Some("390x790")), 0.95);
        // 100 units, rotated.
        assert_eq!(similarity(Some("390x844"), Some("754x390")), 0.85);
    }

    #[test]
    fn aspect_ratio_fallback() {
        // 390x844 ratio 2.164; 600x1300 ratio 2.167 -> diff < 0.05.
        assert_eq!(similarity(Some("390x844"), Some("600x1300")), 0.7);
        // 390x844 vs 600x1350 ratio 2.25 -> diff ~0.086 < 0.15.
        assert_eq!(similarity(Some("390x844"), Some("600x1350")), 0.5);
    }

    #[test]
    fn dissimilar_geometry_is_zero() {
        assert_eq!(similarity(Some("390x844"), Some("1920x1080")), 0.0);
    }

    #[test]
    fn unparsable_or_missing_is_neutral() {
        assert_eq!(similarity(Some("huge"), Some("390x844")), MISSING);
        assert_eq!(similarity(Some("0x844"), Some("390x844")), MISSING);
        assert_eq!(similarity(None, Some("390x844")), MISSING);
    }
}

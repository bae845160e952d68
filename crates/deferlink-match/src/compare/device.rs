//! Device model similarity.
//!
//! A canonical-alias table links model codenames, marketing names, and
//! regulatory codes ("iPhone14,2" <-> "iPhone 13 Pro" <-> "A2638").
//! Models outside the table fall back to a blended lexical similarity:
//! 70% token-set Jaccard (after stripping brand stop-words and
//! punctuation) + 30% character-set Jaccard, mapped through thresholds.

use std::collections::HashSet;

use super::non_empty;

/// Neutral score when either side did not report a model.
pub const MISSING: f64 = 0.4;

/// Canonical model -> known aliases (marketing names, regulatory codes,
/// sibling codenames). All entries lower-case.
const DEVICE_ALIASES: &[(&str, &[&str])] = &[
    // iPhone
    (
        "iphone14,2",
        &["iphone 13 pro", "iphone13,2", "a2638", "a2639"],
    ),
    (
        "iphone14,3",
        &["iphone 13 pro max", "iphone13,3", "a2644", "a2645"],
    ),
    ("iphone13,2", &["iphone 12", "iphone12,1", "a2172", "a2402"]),
    (
        "iphone13,3",
        &["iphone 12 pro max", "iphone12,5", "a2342", "a2410"],
    ),
    // Samsung Galaxy
    (
        "sm-g998b",
        &["galaxy s21 ultra", "samsung galaxy s21 ultra", "sm-g998u"],
    ),
    ("sm-g991b", &["galaxy s21", "samsung galaxy s21", "sm-g991u"]),
    ("sm-g996b", &["galaxy s21+", "samsung galaxy s21+", "sm-g996u"]),
    // Google Pixel
    ("pixel 6", &["pixel 6a", "google pixel 6", "gf5kq", "gb7n6"]),
    ("pixel 7", &["pixel 7a", "google pixel 7", "gvt4a", "gp4bc"]),
    // OnePlus
    ("oneplus 9", &["1+9", "op9", "le2113", "le2115"]),
    ("oneplus 10", &["1+10", "op10", "ne2210", "ne2215"]),
];

/// Brand names carry no model information and are stripped before the
/// lexical comparison.
const BRAND_STOP_WORDS: &[&str] = &["samsung", "apple", "google", "oneplus", "xiaomi"];

/// Compare two device model strings. Inputs are lower-cased and trimmed.
pub fn similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (non_empty(a), non_empty(b)) else {
        return MISSING;
    };
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return MISSING;
    }

    if a == b {
        return 1.0;
    }

    for (canonical, aliases) in DEVICE_ALIASES {
        let a_canonical = a == *canonical;
        let b_canonical = b == *canonical;
        let a_alias = aliases.contains(&a.as_str());
        let b_alias = aliases.contains(&b.as_str());
        if (a_canonical && b_alias) || (b_canonical && a_alias) {
            return 0.95;
        }
        if a_alias && b_alias {
            return 0.9;
        }
    }

    match lexical_similarity(&a, &b) {
        s if s > 0.85 => 0.8,
        s if s > 0.70 => 0.6,
        s if s > 0.50 => 0.4,
        _ => 0.0,
    }
}

/// Blend of token-set Jaccard (70%) and character-set Jaccard (30%) on
/// the cleaned strings.
fn lexical_similarity(a: &str, b: &str) -> f64 {
    let clean_a = preprocess(a);
    let clean_b = preprocess(b);

    let tokens_a: HashSet<&str> = clean_a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = clean_b.split_whitespace().collect();

    if tokens_a.is_empty() && tokens_b.is_empty() {
        // Nothing but brand words and punctuation on both sides.
        return if a == b { 1.0 } else { 0.0 };
    }

    let token_jaccard = jaccard(&tokens_a, &tokens_b);

    let chars_a: HashSet<char> = clean_a.chars().collect();
    let chars_b: HashSet<char> = clean_b.chars().collect();
    let char_jaccard = jaccard(&chars_a, &chars_b);

    token_jaccard * 0.7 + char_jaccard * 0.3
}

/// Strip punctuation and brand stop-words.
fn preprocess(s: &str) -> String {
    let stripped: String = s
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();
    stripped
        .split_whitespace()
        .filter(|word| !BRAND_STOP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn jaccard<T: std::hash::Hash + Eq>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_ignores_case_and_whitespace() {
        assert_eq!(similarity(Some("iPhone14,2"), Some(" iphone14,2 ")), 1.0);
    }

    #[test]
    fn codename_matches_marketing_name() {
        assert_eq!(similarity(Some("iPhone14,2"), Some("iPhone 13 Pro")), 0.95);
        assert_eq!(similarity(Some("A2638"), Some("iphone14,2")), 0.95);
    }

    #[test]
    fn two_aliases_of_one_canonical_match() {
        assert_eq!(similarity(Some("a2638"), Some("a2639")), 0.9);
    }

    #[test]
    fn brand_stop_words_are_ignored_lexically() {
        // "samsung galaxy s22" vs "galaxy s22": identical after stripping.
        let score = similarity(Some("Samsung Galaxy S22"), Some("Galaxy S22"));
        assert_eq!(score, 0.8);
    }

    #[test]
    fn unrelated_models_score_zero() {
        assert_eq!(similarity(Some("iPhone14,2"), Some("SM-G998B")), 0.0);
    }

    #[test]
    fn missing_is_neutral() {
        assert_eq!(similarity(None, Some("iPhone14,2")), MISSING);
        assert_eq!(similarity(Some("   "), Some("iPhone14,2")), MISSING);
    }
}

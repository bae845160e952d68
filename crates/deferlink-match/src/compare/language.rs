//! Language/locale similarity.
//!
//! Bare language codes are expanded to a default region ("en" -> "en_us")
//! before comparison, so a browser reporting "en" and an app reporting
//! "en-US" still score as a normalized match.

use super::non_empty;

/// Neutral score when either side did not report a language.
pub const MISSING: f64 = 0.4;

/// Default region expansion for bare language codes.
const DEFAULT_REGIONS: &[(&str, &str)] = &[
    ("en", "en_us"),
    ("ru", "ru_ru"),
    ("de", "de_de"),
    ("fr", "fr_fr"),
    ("es", "es_es"),
    ("it", "it_it"),
    ("ja", "ja_jp"),
    ("ko", "ko_kr"),
    ("zh", "zh_cn"),
];

/// Regional variants of a common macro-language.
const RELATED_VARIANTS: &[&[&str]] = &[
    &["en_us", "en_gb", "en_au", "en_ca"],
    &["es_es", "es_mx", "es_ar", "es_co"],
    &["fr_fr", "fr_ca", "fr_be", "fr_ch"],
    &["de_de", "de_at", "de_ch"],
    &["pt_pt", "pt_br"],
    &["zh_cn", "zh_tw", "zh_hk"],
];

fn normalize(lang: &str) -> String {
    let lang = lang.to_lowercase().replace('-', "_");
    for (bare, expanded) in DEFAULT_REGIONS {
        if lang == *bare {
            return (*expanded).to_string();
        }
    }
    lang
}

fn base_language(normalized: &str) -> &str {
    normalized.split('_').next().unwrap_or(normalized)
}

/// Compare two locale strings.
pub fn similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (non_empty(a), non_empty(b)) else {
        return MISSING;
    };

    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    if a_lower == b_lower {
        return 1.0;
    }

    let norm_a = normalize(&a_lower);
    let norm_b = normalize(&b_lower);
    if norm_a == norm_b {
        return 0.95;
    }

    if base_language(&norm_a) == base_language(&norm_b) {
        return 0.8;
    }

    for variants in RELATED_VARIANTS {
        if variants.contains(&norm_a.as_str()) && variants.contains(&norm_b.as_str()) {
            return 0.7;
        }
    }

    0.0
}

//! User-agent similarity.
//!
//! A browser UA and an app-embedded webview UA rarely match verbatim, so
//! the comparison works on extracted markers: boolean platform flags and
//! numeric OS-version tokens. The score is the fraction of comparable
//! markers that agree.

use std::sync::LazyLock;

use regex::Regex;

use super::non_empty;

/// Neutral score when either side did not report a user-agent.
pub const MISSING: f64 = 0.3;

/// Platform markers checked on both sides.
const PLATFORM_FLAGS: &[&str] = &["webkit", "mobile", "iphone", "android", "safari", "chrome"];

static IOS_VERSION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"os (\d+)[_.](\d+)").ok());
static ANDROID_VERSION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"android (\d+)[._](\d+)").ok());

#[derive(Debug, Default, PartialEq)]
struct UaMarkers {
    flags: Vec<bool>,
    ios_version: Option<String>,
    android_version: Option<String>,
}

fn extract(ua: &str) -> UaMarkers {
    let version = |re: &Option<Regex>| {
        re.as_ref()
            .and_then(|re| re.captures(ua))
            .map(|c| format!("{}.{}", &c[1], &c[2]))
    };
    UaMarkers {
        flags: PLATFORM_FLAGS.iter().map(|f| ua.contains(f)).collect(),
        ios_version: version(&IOS_VERSION),
        android_version: version(&ANDROID_VERSION),
    }
}

/// Compare two user-agent strings.
pub fn similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (non_empty(a), non_empty(b)) else {
        return MISSING;
    };

    let ma = extract(&a.to_lowercase());
    let mb = extract(&b.to_lowercase());

    let mut matches = 0usize;
    let mut comparable = 0usize;

    for (fa, fb) in ma.flags.iter().zip(mb.flags.iter()) {
        comparable += 1;
        if fa == fb {
            matches += 1;
        }
    }

    // A version token is comparable only when both sides carry it.
    for (va, vb) in [
        (&ma.ios_version, &mb.ios_version),
        (&ma.android_version, &mb.android_version),
    ] {
        if let (Some(va), Some(vb)) = (va, vb) {
            comparable += 1;
            if va == vb {
                matches += 1;
            }
        }
    }

    if comparable == 0 {
        return MISSING;
    }
    matches as f64 / comparable as f64
}

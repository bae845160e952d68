//! Feature comparators: five independent similarity functions, one per
//! fingerprint attribute, each mapping a pair of raw values to [0, 1].
//!
//! Missing data on either side yields a documented neutral constant
//! instead of 0 — absence is uninformative, not disqualifying. All
//! comparators are symmetric in their two arguments.

pub mod device;
pub mod language;
pub mod screen;
pub mod timezone;
pub mod user_agent;

/// Treat `None` and empty strings alike: both mean "not reported".
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

//! Memoization for the two expensive comparators.
//!
//! Timezone and device-model similarity both walk static alias tables
//! and (for devices) run a lexical fallback, so repeated pairs are
//! cached. Concurrent inserts of the same key are idempotent: every
//! writer computes the same score. A periodic maintenance cycle clears
//! both caches to bound long-run memory.

use moka::sync::Cache;

const CACHE_CAPACITY: u64 = 10_000;

/// Shared score caches keyed by the ordered pair of raw input strings.
pub struct SimilarityCaches {
    timezone: Cache<(String, String), f64>,
    device: Cache<(String, String), f64>,
}

impl SimilarityCaches {
    pub fn new() -> Self {
        Self {
            timezone: Cache::builder().max_capacity(CACHE_CAPACITY).build(),
            device: Cache::builder().max_capacity(CACHE_CAPACITY).build(),
        }
    }

    pub fn timezone_score(&self, a: Option<&str>, b: Option<&str>) -> f64 {
        match (a, b) {
            (Some(a), Some(b)) => {
                let key = (a.to_string(), b.to_string());
                self.timezone
                    .get_with(key, || crate::compare::timezone::similarity(Some(a), Some(b)))
            }
            _ => crate::compare::timezone::similarity(a, b),
        }
    }

    pub fn device_score(&self, a: Option<&str>, b: Option<&str>) -> f64 {
        match (a, b) {
            (Some(a), Some(b)) => {
                let key = (a.trim().to_lowercase(), b.trim().to_lowercase());
                self.device
                    .get_with(key, || crate::compare::device::similarity(Some(a), Some(b)))
            }
            _ => crate::compare::device::similarity(a, b),
        }
    }

    /// Drop all memoized scores.
    pub fn clear(&self) {
        self.timezone.invalidate_all();
        self.device.invalidate_all();
    }

    #[cfg(test)]
    pub(crate) fn timezone_entry_count(&self) -> u64 {
        self.timezone.run_pending_tasks();
        self.timezone.entry_count()
    }
}

impl Default for SimilarityCaches {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_score_matches_direct_computation() {
        let caches = SimilarityCaches::new();
        let direct = crate::compare::timezone::similarity(Some("UTC"), Some("Europe/London"));
        assert_eq!(caches.timezone_score(Some("UTC"), Some("Europe/London")), direct);
        // Second lookup hits the cache and returns the same value.
        assert_eq!(caches.timezone_score(Some("UTC"), Some("Europe/London")), direct);
        assert_eq!(caches.timezone_entry_count(), 1);
    }

    #[test]
    fn missing_values_bypass_the_cache() {
        let caches = SimilarityCaches::new();
        assert_eq!(
            caches.timezone_score(None, Some("UTC")),
            crate::compare::timezone::MISSING
        );
        assert_eq!(caches.timezone_entry_count(), 0);
    }

    #[test]
    fn clear_empties_both_caches() {
        let caches = SimilarityCaches::new();
        caches.timezone_score(Some("UTC"), Some("UTC"));
        caches.device_score(Some("iPhone14,2"), Some("iPhone14,2"));
        caches.clear();
        assert_eq!(caches.timezone_entry_count(), 0);
    }
}

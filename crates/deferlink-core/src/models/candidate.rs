use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Confidence;

/// A browser-side touchpoint awaiting correlation with a later app-side
/// query. One row per visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateVisit {
    /// Opaque unique token. Internal reference only, never a matching key.
    pub id: String,
    /// Promotion the visit carries.
    pub promo_id: String,
    /// Destination domain for the attribution context.
    pub domain: String,
    pub user_agent: Option<String>,
    pub timezone: Option<String>,
    pub language: Option<String>,
    pub screen_size: Option<String>,
    pub model: Option<String>,
    /// iOS identifier-for-vendor, stored for diagnostics, never matched on.
    pub idfv: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// open -> resolved transitions at most once; never reopened.
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub match_confidence: Option<Confidence>,
    /// Serialized `MatchBreakdown` persisted at resolution time.
    pub match_details: Option<String>,
}

impl CandidateVisit {
    /// Whether the candidate is past its expiry. Expiry is enforced at
    /// read time as well; this is the in-process check.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the candidate may still be matched.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        !self.is_resolved && !self.is_expired(now)
    }
}

/// Fields supplied by the browser-side touchpoint when a candidate is
/// created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRequest {
    pub promo_id: String,
    pub domain: String,
    pub user_agent: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub screen_size: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub idfv: Option<String>,
    /// Requested TTL in hours; clamped to the configured maximum.
    #[serde(default)]
    pub ttl_hours: Option<u64>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

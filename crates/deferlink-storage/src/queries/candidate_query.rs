//! Pool and feedback-history queries.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use deferlink_core::errors::DeferlinkResult;
use deferlink_core::models::CandidateVisit;
use deferlink_core::traits::ResolvedOutcome;

use super::candidate_crud::{row_to_candidate, CANDIDATE_COLUMNS};
use crate::to_storage_err;

/// Up to `limit` open, unexpired candidates, newest first.
///
/// Expiry is enforced here at read time; the reaper deleting the rows is
/// a separate concern.
pub fn open_unexpired_candidates(
    conn: &Connection,
    limit: usize,
    now: DateTime<Utc>,
) -> DeferlinkResult<Vec<CandidateVisit>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates
             WHERE expires_at > ?1 AND is_resolved = 0
             ORDER BY created_at DESC
             LIMIT ?2"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![now.to_rfc3339(), limit as i64], |row| {
            Ok(row_to_candidate(row))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut candidates = Vec::new();
    for row in rows {
        candidates.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(candidates)
}

/// Most recent resolved outcomes with stored confidence above `threshold`.
pub fn resolved_with_confidence_above(
    conn: &Connection,
    threshold: f64,
    limit: usize,
) -> DeferlinkResult<Vec<ResolvedOutcome>> {
    let mut stmt = conn
        .prepare(
            "SELECT match_details, match_confidence FROM candidates
             WHERE is_resolved = 1
               AND match_details IS NOT NULL
               AND match_confidence > ?1
             ORDER BY resolved_at DESC
             LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![threshold, limit as i64], |row| {
            Ok(ResolvedOutcome {
                details: row.get(0)?,
                confidence: row.get(1)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

//! Insert, lookup, and the conditional open -> resolved transition.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use deferlink_core::errors::DeferlinkResult;
use deferlink_core::models::{CandidateVisit, Confidence};

use crate::to_storage_err;

/// Columns selected for a full candidate row, in parse order.
pub(crate) const CANDIDATE_COLUMNS: &str = "candidate_id, promo_id, domain, user_agent, timezone, \
     language, screen_size, model, idfv, ip_address, created_at, expires_at, \
     is_resolved, resolved_at, match_confidence, match_details";

/// Insert a single candidate.
pub fn insert_candidate(conn: &Connection, candidate: &CandidateVisit) -> DeferlinkResult<()> {
    conn.execute(
        "INSERT INTO candidates (
            candidate_id, promo_id, domain, user_agent, timezone, language,
            screen_size, model, idfv, ip_address, created_at, expires_at,
            is_resolved, resolved_at, match_confidence, match_details
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16
        )",
        params![
            candidate.id,
            candidate.promo_id,
            candidate.domain,
            candidate.user_agent,
            candidate.timezone,
            candidate.language,
            candidate.screen_size,
            candidate.model,
            candidate.idfv,
            candidate.ip_address,
            candidate.created_at.to_rfc3339(),
            candidate.expires_at.to_rfc3339(),
            candidate.is_resolved as i32,
            candidate.resolved_at.map(|t| t.to_rfc3339()),
            candidate.match_confidence.map(|c| c.value()),
            candidate.match_details,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get a candidate by id, excluding expired rows.
pub fn get_candidate(
    conn: &Connection,
    id: &str,
    now: DateTime<Utc>,
) -> DeferlinkResult<Option<CandidateVisit>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates
             WHERE candidate_id = ?1 AND expires_at > ?2"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = stmt
        .query_row(params![id, now.to_rfc3339()], |row| {
            Ok(row_to_candidate(row))
        })
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match result {
        Some(Ok(candidate)) => Ok(Some(candidate)),
        Some(Err(e)) => Err(e),
        None => Ok(None),
    }
}

/// Flip a candidate to resolved iff it is still open and unexpired.
///
/// A single conditional UPDATE closes the read-then-write race window:
/// two concurrent resolvers targeting the same row see exactly one
/// affected-row count of 1. Returns true iff this caller won.
pub fn conditional_resolve(
    conn: &Connection,
    id: &str,
    confidence: Confidence,
    details: &str,
    now: DateTime<Utc>,
) -> DeferlinkResult<bool> {
    let ts = now.to_rfc3339();
    let rows = conn
        .execute(
            "UPDATE candidates
             SET is_resolved = 1,
                 resolved_at = ?2,
                 match_confidence = ?3,
                 match_details = ?4,
                 updated_at = ?2
             WHERE candidate_id = ?1
               AND is_resolved = 0
               AND expires_at > ?5",
            params![id, ts, confidence.value(), details, ts],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    debug_assert!(rows <= 1, "candidate_id is the primary key");
    Ok(rows == 1)
}

/// Parse a row from the candidates table into a CandidateVisit.
pub(crate) fn row_to_candidate(row: &rusqlite::Row<'_>) -> DeferlinkResult<CandidateVisit> {
    let created_at_str: String = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;
    let expires_at_str: String = row.get(11).map_err(|e| to_storage_err(e.to_string()))?;
    let resolved_at_str: Option<String> = row.get(13).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> DeferlinkResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
    };

    Ok(CandidateVisit {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        promo_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        domain: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        user_agent: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        timezone: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        language: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        screen_size: row.get(6).map_err(|e| to_storage_err(e.to_string()))?,
        model: row.get(7).map_err(|e| to_storage_err(e.to_string()))?,
        idfv: row.get(8).map_err(|e| to_storage_err(e.to_string()))?,
        ip_address: row.get(9).map_err(|e| to_storage_err(e.to_string()))?,
        created_at: parse_dt(&created_at_str)?,
        expires_at: parse_dt(&expires_at_str)?,
        is_resolved: row
            .get::<_, i32>(12)
            .map_err(|e| to_storage_err(e.to_string()))?
            != 0,
        resolved_at: resolved_at_str.as_deref().map(parse_dt).transpose()?,
        match_confidence: row
            .get::<_, Option<f64>>(14)
            .map_err(|e| to_storage_err(e.to_string()))?
            .map(Confidence::new),
        match_details: row.get(15).map_err(|e| to_storage_err(e.to_string()))?,
    })
}

/// Helper trait to make `query_row` return `Option` on not-found.
pub(crate) trait OptionalRow<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

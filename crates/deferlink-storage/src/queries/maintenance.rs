//! Expiry reaping, per-address request counts, and aggregate statistics.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};

use deferlink_core::errors::DeferlinkResult;
use deferlink_core::models::StoreStats;

use crate::to_storage_err;

/// Delete candidates past their expiry. Returns the count removed.
pub fn delete_expired(conn: &Connection, now: DateTime<Utc>) -> DeferlinkResult<usize> {
    conn.execute(
        "DELETE FROM candidates WHERE expires_at <= ?1",
        params![now.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Candidates created from `ip` in the trailing hour.
pub fn requests_last_hour(
    conn: &Connection,
    ip: &str,
    now: DateTime<Utc>,
) -> DeferlinkResult<u64> {
    let cutoff = (now - Duration::hours(1)).to_rfc3339();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM candidates WHERE ip_address = ?1 AND created_at >= ?2",
            params![ip, cutoff],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u64)
}

/// Aggregate statistics over the candidate table.
pub fn stats(conn: &Connection, now: DateTime<Utc>) -> DeferlinkResult<StoreStats> {
    let ts = now.to_rfc3339();
    let hour_ago = (now - Duration::hours(1)).to_rfc3339();

    let count = |sql: &str, params: &[&dyn rusqlite::ToSql]| -> DeferlinkResult<u64> {
        let n: i64 = conn
            .query_row(sql, params, |row| row.get(0))
            .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(n as u64)
    };

    let total = count("SELECT COUNT(*) FROM candidates", &[])?;
    let resolved = count(
        "SELECT COUNT(*) FROM candidates WHERE is_resolved = 1",
        &[],
    )?;
    let active = count(
        "SELECT COUNT(*) FROM candidates WHERE expires_at > ?1 AND is_resolved = 0",
        &[&ts],
    )?;
    let created_last_hour = count(
        "SELECT COUNT(*) FROM candidates WHERE created_at >= ?1",
        &[&hour_ago],
    )?;

    let average_confidence: f64 = conn
        .query_row(
            "SELECT COALESCE(AVG(match_confidence), 0.0) FROM candidates
             WHERE match_confidence IS NOT NULL",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let success_rate = if total > 0 {
        resolved as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    Ok(StoreStats {
        total_candidates: total,
        active_candidates: active,
        resolved_candidates: resolved,
        success_rate,
        average_confidence,
        created_last_hour,
    })
}

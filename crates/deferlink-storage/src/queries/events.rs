//! Analytics event log. Best-effort; callers never fail on event errors.

use rusqlite::{params, Connection};

use deferlink_core::errors::DeferlinkResult;

use crate::to_storage_err;

/// Record an analytics event with JSON metadata.
pub fn record_event(
    conn: &Connection,
    candidate_id: Option<&str>,
    event_type: &str,
    metadata: &serde_json::Value,
) -> DeferlinkResult<()> {
    conn.execute(
        "INSERT INTO analytics_events (candidate_id, event_type, metadata)
         VALUES (?1, ?2, ?3)",
        params![candidate_id, event_type, metadata.to_string()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

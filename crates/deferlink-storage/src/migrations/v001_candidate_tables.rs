//! v001: candidates, analytics_events.

use rusqlite::Connection;

use deferlink_core::errors::DeferlinkResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> DeferlinkResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS candidates (
            candidate_id     TEXT PRIMARY KEY,
            promo_id         TEXT NOT NULL,
            domain           TEXT NOT NULL,
            user_agent       TEXT,
            timezone         TEXT,
            language         TEXT,
            screen_size      TEXT,
            model            TEXT,
            idfv             TEXT,
            ip_address       TEXT,
            created_at       TEXT NOT NULL,
            expires_at       TEXT NOT NULL,
            is_resolved      INTEGER NOT NULL DEFAULT 0,
            resolved_at      TEXT,
            match_confidence REAL,
            match_details    TEXT,
            updated_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_candidates_expires_at ON candidates(expires_at);
        CREATE INDEX IF NOT EXISTS idx_candidates_created_at ON candidates(created_at);
        CREATE INDEX IF NOT EXISTS idx_candidates_resolved ON candidates(is_resolved);
        CREATE INDEX IF NOT EXISTS idx_candidates_ip ON candidates(ip_address);
        CREATE INDEX IF NOT EXISTS idx_candidates_confidence ON candidates(match_confidence);
        CREATE INDEX IF NOT EXISTS idx_candidates_resolved_at ON candidates(resolved_at);
        CREATE INDEX IF NOT EXISTS idx_candidates_open
            ON candidates(expires_at, is_resolved) WHERE is_resolved = 0;

        CREATE TABLE IF NOT EXISTS analytics_events (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            candidate_id TEXT,
            event_type   TEXT NOT NULL,
            metadata     TEXT,
            recorded_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_events_recorded_at ON analytics_events(recorded_at);
        CREATE INDEX IF NOT EXISTS idx_events_type ON analytics_events(event_type);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

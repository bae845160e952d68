//! Versioned schema migrations, tracked via `PRAGMA user_version`.

mod v001_candidate_tables;

use rusqlite::Connection;

use deferlink_core::errors::{DeferlinkError, DeferlinkResult, StorageError};

use crate::to_storage_err;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Run all pending migrations on the given connection.
pub fn run_migrations(conn: &Connection) -> DeferlinkResult<()> {
    let version = current_version(conn)?;

    if version < 1 {
        v001_candidate_tables::migrate(conn).map_err(|e| {
            DeferlinkError::Storage(StorageError::MigrationFailed {
                version: 1,
                reason: e.to_string(),
            })
        })?;
        set_version(conn, 1)?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}

fn current_version(conn: &Connection) -> DeferlinkResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

fn set_version(conn: &Connection, version: u32) -> DeferlinkResult<()> {
    conn.pragma_update(None, "user_version", version)
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

//! StorageEngine — owns the ConnectionPool, implements CandidateStore,
//! startup pragma configuration and migrations.

use std::path::Path;

use chrono::Utc;

use deferlink_core::errors::DeferlinkResult;
use deferlink_core::models::{CandidateVisit, Confidence, StoreStats};
use deferlink_core::traits::{CandidateStore, ResolvedOutcome};

use crate::migrations;
use crate::pool::ConnectionPool;

/// The main storage engine. Owns the connection pool and provides the
/// full CandidateStore interface.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode,
    /// because in-memory read pool connections are isolated databases).
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> DeferlinkResult<Self> {
        let pool = ConnectionPool::open(path, 4)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> DeferlinkResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations on the write connection.
    fn initialize(&self) -> DeferlinkResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> DeferlinkResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> DeferlinkResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl CandidateStore for StorageEngine {
    fn insert_candidate(&self, candidate: &CandidateVisit) -> DeferlinkResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::candidate_crud::insert_candidate(conn, candidate))
    }

    fn get_candidate(&self, id: &str) -> DeferlinkResult<Option<CandidateVisit>> {
        self.with_reader(|conn| crate::queries::candidate_crud::get_candidate(conn, id, Utc::now()))
    }

    fn open_unexpired_candidates(&self, limit: usize) -> DeferlinkResult<Vec<CandidateVisit>> {
        self.with_reader(|conn| {
            crate::queries::candidate_query::open_unexpired_candidates(conn, limit, Utc::now())
        })
    }

    fn conditional_resolve(
        &self,
        id: &str,
        confidence: Confidence,
        details: &str,
    ) -> DeferlinkResult<bool> {
        self.pool.writer.with_conn_sync(|conn| {
            crate::queries::candidate_crud::conditional_resolve(
                conn,
                id,
                confidence,
                details,
                Utc::now(),
            )
        })
    }

    fn delete_expired(&self) -> DeferlinkResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::maintenance::delete_expired(conn, Utc::now()))
    }

    fn resolved_with_confidence_above(
        &self,
        threshold: f64,
        limit: usize,
    ) -> DeferlinkResult<Vec<ResolvedOutcome>> {
        self.with_reader(|conn| {
            crate::queries::candidate_query::resolved_with_confidence_above(conn, threshold, limit)
        })
    }

    fn requests_last_hour(&self, ip: &str) -> DeferlinkResult<u64> {
        self.with_reader(|conn| {
            crate::queries::maintenance::requests_last_hour(conn, ip, Utc::now())
        })
    }

    fn stats(&self) -> DeferlinkResult<StoreStats> {
        self.with_reader(|conn| crate::queries::maintenance::stats(conn, Utc::now()))
    }

    fn record_event(
        &self,
        candidate_id: Option<&str>,
        event_type: &str,
        metadata: &serde_json::Value,
    ) -> DeferlinkResult<()> {
        // Best-effort: analytics must never fail a user-facing call.
        let result = self.pool.writer.with_conn_sync(|conn| {
            crate::queries::events::record_event(conn, candidate_id, event_type, metadata)
        });
        if let Err(e) = result {
            tracing::warn!(event_type = %event_type, error = %e, "failed to record analytics event");
        }
        Ok(())
    }
}

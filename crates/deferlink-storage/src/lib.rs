//! # deferlink-storage
//!
//! SQLite persistence for the candidate pool: connection pool (single
//! writer + round-robin readers, WAL), migrations, and the query modules
//! behind the `CandidateStore` contract.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use deferlink_core::errors::{DeferlinkError, StorageError};

/// Wrap a low-level SQLite failure message in the crate error type.
pub fn to_storage_err(message: String) -> DeferlinkError {
    DeferlinkError::Storage(StorageError::SqliteError { message })
}

//! Error taxonomy for the engine.
//!
//! "No match", lost resolution races, and insufficient adaptation data are
//! defined outcomes, not errors; only storage failures and malformed input
//! that cannot be degraded surface through these types.

mod storage_error;

pub use storage_error::StorageError;

/// Top-level error type for all DeferLink operations.
#[derive(Debug, thiserror::Error)]
pub enum DeferlinkError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("candidate not found: {id}")]
    CandidateNotFound { id: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },
}

/// Result alias used across all DeferLink crates.
pub type DeferlinkResult<T> = Result<T, DeferlinkError>;

impl From<serde_json::Error> for DeferlinkError {
    fn from(e: serde_json::Error) -> Self {
        DeferlinkError::Serialization {
            message: e.to_string(),
        }
    }
}

//! Journal error types.

use thiserror::Error;
use weft_store::StoreError;

/// Journal errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JournalError {
    /// The store rejected or never received the combined update. Queued
    /// nodes are kept for retry.
    #[error("Commit failed: {0}")]
    CommitFailure(#[source] StoreError),

    /// A commit is already in flight.
    #[error("A commit is already in progress")]
    AlreadyCommitting,

    /// Completion reported with no commit in flight.
    #[error("No commit is in progress")]
    NotCommitting,
}

/// Result type for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;

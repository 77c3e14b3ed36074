//! Error types for the reconciliation engine.
//!
//! Almost everything is handled locally: unresolved references and
//! malformed items are skipped and retried next pass, a failed batch
//! leaves store and cache consistent. The only error that escapes a pass
//! is the store being unreachable; the pass aborts cleanly and the next
//! scheduled cycle retries.

use thiserror::Error;

use cartograph_core::CoreError;
use cartograph_db::DbError;

/// Result alias using [`RecorderError`].
pub type RecorderResult<T> = std::result::Result<T, RecorderError>;

/// Errors that abort a reconciliation pass.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The store is unreachable; the pass aborts and is retried on the
    /// next scheduled cycle.
    #[error("store unavailable: {0}")]
    Store(#[from] DbError),

    /// The declared dependency graph could not be ordered.
    #[error(transparent)]
    Core(#[from] CoreError),
}

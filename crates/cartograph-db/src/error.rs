//! Error types for the cartograph-db crate.
//!
//! The one distinction that matters to callers is connectivity versus
//! everything else: a connectivity failure aborts the current
//! reconciliation pass, any other failure is contained to its batch and
//! retried on the next scheduled pass.

use thiserror::Error;

/// Result alias using [`DbError`].
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to establish or keep a database connection.
    #[error("database connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// The store is unreachable (in-memory failure injection, or a pool
    /// that never came up).
    #[error("store unreachable: {0}")]
    Unreachable(String),

    /// A database migration failed to apply.
    #[error("migration failed: {0}")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),

    /// A query failed to execute. The batch it belonged to was not
    /// applied.
    #[error("query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// A batch violated a unique constraint (duplicate logical ID).
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
}

impl DbError {
    /// True when the store itself is unreachable, as opposed to a single
    /// statement failing.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionFailed(_) | DbError::Unreachable(_)
        )
    }

    /// Classifies a sqlx error into connectivity versus query failure.
    #[must_use]
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => DbError::ConnectionFailed(err),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                DbError::UniqueViolation(db.to_string())
            }
            other => DbError::QueryFailed(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_classification() {
        assert!(DbError::Unreachable("injected".into()).is_connectivity());
        assert!(DbError::from_sqlx(sqlx::Error::PoolTimedOut).is_connectivity());
        assert!(!DbError::from_sqlx(sqlx::Error::RowNotFound).is_connectivity());
    }
}

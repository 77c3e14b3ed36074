//! Database migrations.

use sqlx::PgPool;

use crate::error::{DbError, DbResult};

/// Applies all pending migrations.
///
/// # Errors
///
/// Returns [`DbError::MigrationFailed`] when a migration cannot be
/// applied.
pub async fn run(pool: &PgPool) -> DbResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DbError::MigrationFailed)?;
    tracing::info!("database migrations applied");
    Ok(())
}

//! Connection pool construction.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DbConfig;
use crate::error::{DbError, DbResult};

/// Connects to Postgres using the given configuration.
///
/// # Errors
///
/// Returns [`DbError::ConnectionFailed`] when the pool cannot be
/// established.
pub async fn connect(config: &DbConfig) -> DbResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(DbError::ConnectionFailed)?;
    tracing::info!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

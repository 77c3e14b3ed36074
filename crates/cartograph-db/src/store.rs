//! The generic batch-CRUD store boundary.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, QueryBuilder};
use std::marker::PhantomData;

use crate::error::{DbError, DbResult};
use crate::row::{PgBind, StoreRow};
use crate::value::{FieldChanges, FieldValue};

/// Batch CRUD over one resource table.
///
/// Every mutation is all-or-nothing for the batch it is given: on error
/// the store is unchanged, so the caller's cache never runs ahead of the
/// store.
#[async_trait]
pub trait ResourceStore<R: StoreRow>: Send + Sync {
    /// Inserts a batch of rows and returns them with surrogate keys
    /// assigned by the store.
    async fn insert_batch(&self, rows: Vec<R>) -> DbResult<Vec<R>>;

    /// Applies a field-level update to the row with the given logical ID.
    async fn update_fields(&self, logical_id: &str, changes: &FieldChanges) -> DbResult<()>;

    /// Deletes the rows with the given logical IDs. Soft-delete types are
    /// tombstoned, hard-delete types removed.
    async fn delete_batch(&self, logical_ids: &[String]) -> DbResult<()>;

    /// Fetches all non-deleted rows.
    async fn fetch_all(&self) -> DbResult<Vec<R>>;
}

/// [`ResourceStore`] over sqlx/Postgres.
#[derive(Debug, Clone)]
pub struct PgStore<R> {
    pool: PgPool,
    _row: PhantomData<fn() -> R>,
}

impl<R> PgStore<R> {
    /// Creates a store over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _row: PhantomData,
        }
    }
}

fn push_field<'args>(
    sep: &mut sqlx::query_builder::Separated<'_, 'args, sqlx::Postgres, &'static str>,
    column: &'static str,
    value: &'args FieldValue,
) {
    sep.push(format!("{column} = "));
    match value {
        FieldValue::Text(s) => sep.push_bind_unseparated(s.as_str()),
        FieldValue::Int(i) => sep.push_bind_unseparated(*i),
        FieldValue::Bool(b) => sep.push_bind_unseparated(*b),
    };
}

#[async_trait]
impl<R> ResourceStore<R> for PgStore<R>
where
    R: StoreRow + PgBind + for<'r> FromRow<'r, PgRow> + Unpin,
{
    async fn insert_batch(&self, rows: Vec<R>) -> DbResult<Vec<R>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut tx = self.pool.begin().await.map_err(DbError::from_sqlx)?;
        if R::SOFT_DELETE {
            // A tombstoned row does not hold the logical ID. Purge any
            // tombstones the batch collides with so the insert revives
            // resources that reappear after a soft delete.
            let ids: Vec<String> = rows.iter().map(|r| r.logical_id().to_string()).collect();
            let sql = format!(
                "DELETE FROM {} WHERE lcuuid = ANY($1) AND deleted_at IS NOT NULL",
                R::TABLE
            );
            sqlx::query(&sql)
                .bind(&ids)
                .execute(&mut *tx)
                .await
                .map_err(DbError::from_sqlx)?;
        }
        let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) ",
            R::TABLE,
            R::insert_columns().join(", ")
        ));
        qb.push_values(rows.iter(), |mut b, row| row.push_insert_values(&mut b));
        qb.push(" RETURNING *");
        let inserted = qb
            .build_query_as::<R>()
            .fetch_all(&mut *tx)
            .await
            .map_err(DbError::from_sqlx)?;
        tx.commit().await.map_err(DbError::from_sqlx)?;
        Ok(inserted)
    }

    async fn update_fields(&self, logical_id: &str, changes: &FieldChanges) -> DbResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut qb: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET ", R::TABLE));
        let mut sep = qb.separated(", ");
        for (column, value) in changes.iter() {
            push_field(&mut sep, column, value);
        }
        qb.push(" WHERE lcuuid = ");
        qb.push_bind(logical_id);
        qb.build()
            .execute(&self.pool)
            .await
            .map_err(DbError::from_sqlx)?;
        Ok(())
    }

    async fn delete_batch(&self, logical_ids: &[String]) -> DbResult<()> {
        if logical_ids.is_empty() {
            return Ok(());
        }
        let sql = if R::SOFT_DELETE {
            format!(
                "UPDATE {} SET deleted_at = NOW() WHERE lcuuid = ANY($1) AND deleted_at IS NULL",
                R::TABLE
            )
        } else {
            format!("DELETE FROM {} WHERE lcuuid = ANY($1)", R::TABLE)
        };
        sqlx::query(&sql)
            .bind(logical_ids)
            .execute(&self.pool)
            .await
            .map_err(DbError::from_sqlx)?;
        Ok(())
    }

    async fn fetch_all(&self) -> DbResult<Vec<R>> {
        let sql = if R::SOFT_DELETE {
            format!("SELECT * FROM {} WHERE deleted_at IS NULL", R::TABLE)
        } else {
            format!("SELECT * FROM {}", R::TABLE)
        };
        sqlx::query_as::<_, R>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from_sqlx)
    }
}

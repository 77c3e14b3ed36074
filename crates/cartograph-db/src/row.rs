//! Row metadata traits.
//!
//! [`StoreRow`] carries the per-type store policy: table name, soft or
//! hard delete, and surrogate-key plumbing. [`PgBind`] adds the Postgres
//! insert binding; rows that never touch Postgres (test doubles) only
//! need [`StoreRow`].

use chrono::{DateTime, Utc};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;

/// Metadata and key plumbing for a persisted resource row.
///
/// Surrogate keys are assigned by the store on insert; a row constructed
/// from a snapshot carries key `0` until the store returns it.
pub trait StoreRow: Clone + Send + Sync + 'static {
    /// Table name, also used in logs.
    const TABLE: &'static str;

    /// Soft-deletable rows keep a `deleted_at` tombstone and are excluded
    /// from reads; hard-deletable rows are physically removed.
    const SOFT_DELETE: bool = false;

    /// The stable external identifier of this row.
    fn logical_id(&self) -> &str;

    /// The store-assigned surrogate key (`0` before insert).
    fn surrogate_key(&self) -> i32;

    /// Sets the surrogate key after insert.
    fn set_surrogate_key(&mut self, key: i32);

    /// Tombstone timestamp for soft-deletable rows.
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Marks or clears the tombstone. No-op for hard-delete types.
    fn set_deleted_at(&mut self, _at: Option<DateTime<Utc>>) {}
}

/// Postgres insert binding for a row type.
pub trait PgBind: StoreRow {
    /// The columns written on insert, in binding order. The surrogate key
    /// column is excluded; the store assigns it.
    fn insert_columns() -> &'static [&'static str];

    /// Pushes this row's values in [`Self::insert_columns`] order.
    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>);
}

//! # Cartograph Store Boundary
//!
//! Row models and the batch-CRUD boundary between the reconciliation
//! engine and the persistent store.
//!
//! The engine talks to the store through exactly three batch operations
//! per resource type plus a full read, defined by [`ResourceStore`]:
//!
//! - `insert_batch` - batch insert, surrogate keys assigned by the store
//! - `update_fields` - field-level update of a single row by logical ID
//! - `delete_batch` - batch delete, soft or hard per type
//! - `fetch_all` - full read of non-deleted rows (cache warm-up, diffs)
//!
//! Two implementations are provided: [`PgStore`] over sqlx/Postgres and
//! [`MemoryStore`] for tests and local development. A whole-batch failure
//! leaves the store unchanged so callers never advance their caches past
//! the store.

pub mod config;
pub mod error;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod row;
pub mod store;
pub mod value;

pub use config::DbConfig;
pub use error::{DbError, DbResult};
pub use memory::MemoryStore;
pub use pool::connect;
pub use row::{PgBind, StoreRow};
pub use store::{PgStore, ResourceStore};
pub use value::{FieldChanges, FieldValue};

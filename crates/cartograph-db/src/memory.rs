//! In-memory store implementation.
//!
//! Backs the recorder's test suite and local development. Behaves like the
//! Postgres store at the boundary: batches are all-or-nothing, surrogate
//! keys are assigned on insert, soft-delete types are tombstoned and
//! excluded from reads. A connectivity-failure toggle lets tests exercise
//! the abort-and-retry path, and per-operation counters let them assert
//! write counts (idempotence).

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{DbError, DbResult};
use crate::row::StoreRow;
use crate::value::{FieldChanges, FieldValue};

#[derive(Debug)]
struct MemoryInner<R> {
    rows: HashMap<String, R>,
    next_key: i32,
}

/// An in-memory [`ResourceStore`](crate::ResourceStore).
#[derive(Debug)]
pub struct MemoryStore<R> {
    inner: Mutex<MemoryInner<R>>,
    unreachable: AtomicBool,
    insert_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> MemoryStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                rows: HashMap::new(),
                next_key: 1,
            }),
            unreachable: AtomicBool::new(false),
            insert_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Toggles connectivity-failure injection: while set, every operation
    /// fails with [`DbError::Unreachable`].
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of non-empty insert batches issued.
    #[must_use]
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Number of field updates issued.
    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Number of non-empty delete batches issued.
    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> DbResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(DbError::Unreachable("injected failure".to_string()));
        }
        Ok(())
    }
}

impl<R: StoreRow> MemoryStore<R> {
    /// Returns the live (non-tombstoned) row with this logical ID.
    pub fn get(&self, logical_id: &str) -> Option<R> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .rows
            .get(logical_id)
            .filter(|r| r.deleted_at().is_none())
            .cloned()
    }

    /// Number of live rows.
    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .rows
            .values()
            .filter(|r| r.deleted_at().is_none())
            .count()
    }

    /// True when no live rows exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seeds a row directly, assigning a surrogate key. Test setup only;
    /// bypasses counters.
    pub fn seed(&self, mut row: R) -> R {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let key = inner.next_key;
        inner.next_key += 1;
        row.set_surrogate_key(key);
        inner.rows.insert(row.logical_id().to_string(), row.clone());
        row
    }
}

#[async_trait]
impl<R> crate::store::ResourceStore<R> for MemoryStore<R>
where
    R: StoreRow + serde::Serialize + serde::de::DeserializeOwned,
{
    async fn insert_batch(&self, rows: Vec<R>) -> DbResult<Vec<R>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.check_reachable()?;
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        // Whole batch fails before any row lands, like a single INSERT.
        // Tombstoned rows do not hold the logical ID; an insert revives it.
        for row in &rows {
            let live = inner
                .rows
                .get(row.logical_id())
                .is_some_and(|existing| existing.deleted_at().is_none());
            if live {
                return Err(DbError::UniqueViolation(format!(
                    "{}.lcuuid = {}",
                    R::TABLE,
                    row.logical_id()
                )));
            }
        }
        let mut inserted = Vec::with_capacity(rows.len());
        for mut row in rows {
            let key = inner.next_key;
            inner.next_key += 1;
            row.set_surrogate_key(key);
            inner.rows.insert(row.logical_id().to_string(), row.clone());
            inserted.push(row);
        }
        Ok(inserted)
    }

    async fn update_fields(&self, logical_id: &str, changes: &FieldChanges) -> DbResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        self.check_reachable()?;
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(row) = inner.rows.get_mut(logical_id) {
            let updated = apply_changes(row.clone(), changes);
            *row = updated;
        }
        Ok(())
    }

    async fn delete_batch(&self, logical_ids: &[String]) -> DbResult<()> {
        if logical_ids.is_empty() {
            return Ok(());
        }
        self.check_reachable()?;
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        for id in logical_ids {
            if R::SOFT_DELETE {
                if let Some(row) = inner.rows.get_mut(id.as_str()) {
                    row.set_deleted_at(Some(Utc::now()));
                }
            } else {
                inner.rows.remove(id.as_str());
            }
        }
        Ok(())
    }

    async fn fetch_all(&self) -> DbResult<Vec<R>> {
        self.check_reachable()?;
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .rows
            .values()
            .filter(|r| r.deleted_at().is_none())
            .cloned()
            .collect())
    }
}

/// Applies a field diff to a cloned row through its serde representation,
/// mirroring what the SQL `UPDATE ... SET` does column by column.
fn apply_changes<R>(row: R, changes: &FieldChanges) -> R
where
    R: serde::Serialize + serde::de::DeserializeOwned,
{
    let mut value = match serde_json::to_value(&row) {
        Ok(v) => v,
        Err(_) => return row,
    };
    if let Some(object) = value.as_object_mut() {
        for (column, field) in changes.iter() {
            let json = match field {
                FieldValue::Text(s) => serde_json::Value::String(s.clone()),
                FieldValue::Int(i) => serde_json::Value::from(*i),
                FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            };
            object.insert((*column).to_string(), json);
        }
    }
    serde_json::from_value(value).unwrap_or(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AzRow, VmRow};
    use crate::store::ResourceStore;
    use crate::value::FieldChanges;

    fn az(lcuuid: &str, name: &str) -> AzRow {
        AzRow {
            lcuuid: lcuuid.to_string(),
            name: name.to_string(),
            ..AzRow::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_surrogate_keys() {
        let store = MemoryStore::<AzRow>::new();
        let inserted = store
            .insert_batch(vec![az("az-1", "AZ1"), az("az-2", "AZ2")])
            .await
            .unwrap();
        assert_eq!(inserted.len(), 2);
        assert!(inserted.iter().all(|r| r.id > 0));
        assert_ne!(inserted[0].id, inserted[1].id);
        assert_eq!(store.insert_calls(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_batch_leaves_store_unchanged() {
        let store = MemoryStore::<AzRow>::new();
        store.insert_batch(vec![az("az-1", "AZ1")]).await.unwrap();
        let err = store
            .insert_batch(vec![az("az-2", "AZ2"), az("az-1", "dup")])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation(_)));
        assert_eq!(store.len(), 1);
        assert!(store.get("az-2").is_none());
    }

    #[tokio::test]
    async fn test_update_fields_applies_diff() {
        let store = MemoryStore::<AzRow>::new();
        store.insert_batch(vec![az("az-1", "AZ1")]).await.unwrap();
        let mut changes = FieldChanges::new();
        changes.set("name", "AZ1-new");
        store.update_fields("az-1", &changes).await.unwrap();
        assert_eq!(store.get("az-1").unwrap().name, "AZ1-new");
    }

    #[tokio::test]
    async fn test_soft_delete_tombstones_and_hides() {
        let store = MemoryStore::<VmRow>::new();
        let vm = VmRow {
            lcuuid: "vm-1".to_string(),
            ..VmRow::default()
        };
        store.insert_batch(vec![vm]).await.unwrap();
        store.delete_batch(&["vm-1".to_string()]).await.unwrap();
        assert!(store.get("vm-1").is_none());
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_revives_tombstoned_row() {
        let store = MemoryStore::<VmRow>::new();
        let vm = VmRow {
            lcuuid: "vm-1".to_string(),
            ..VmRow::default()
        };
        let first = store.insert_batch(vec![vm.clone()]).await.unwrap();
        store.delete_batch(&["vm-1".to_string()]).await.unwrap();
        let second = store.insert_batch(vec![vm]).await.unwrap();
        assert_eq!(second.len(), 1);
        assert!(second[0].deleted_at.is_none());
        assert_ne!(first[0].id, second[0].id);
        assert!(store.get("vm-1").is_some());
    }

    #[tokio::test]
    async fn test_unreachable_fails_everything() {
        let store = MemoryStore::<AzRow>::new();
        store.set_unreachable(true);
        let err = store.insert_batch(vec![az("az-1", "AZ1")]).await.unwrap_err();
        assert!(err.is_connectivity());
        store.set_unreachable(false);
        assert!(store.insert_batch(vec![az("az-1", "AZ1")]).await.is_ok());
    }
}

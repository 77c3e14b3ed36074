//! Store operator.
//!
//! Thin wrapper over a `ResourceStore` handle that adds chunking, per-row
//! success logging and error classification. Connectivity failures bubble
//! up and abort the pass; any other store failure is logged and the
//! affected batch is skipped, to be retried when the next snapshot arrives.

use std::sync::Arc;

use tracing::{info, warn};

use cartograph_core::ResourceType;
use cartograph_db::{FieldChanges, ResourceStore, StoreRow};

use crate::error::RecorderResult;

/// Batch CRUD for one resource type.
pub struct Operator<R: StoreRow> {
    store: Arc<dyn ResourceStore<R>>,
    resource_type: ResourceType,
    batch_size: usize,
}

impl<R: StoreRow> Operator<R> {
    pub fn new(store: Arc<dyn ResourceStore<R>>, resource_type: ResourceType, batch_size: usize) -> Self {
        Self {
            store,
            resource_type,
            batch_size: batch_size.max(1),
        }
    }

    /// The store handle this operator writes through.
    pub fn store(&self) -> Arc<dyn ResourceStore<R>> {
        Arc::clone(&self.store)
    }

    /// Inserts rows in chunks of the configured batch size and returns the
    /// inserted rows with their surrogate keys assigned. A chunk that fails
    /// for a non-connectivity reason is dropped from the result.
    pub async fn add_batch(&self, rows: Vec<R>) -> RecorderResult<Vec<R>> {
        let mut inserted = Vec::with_capacity(rows.len());
        let mut chunks = rows.into_iter().peekable();
        while chunks.peek().is_some() {
            let chunk: Vec<R> = chunks.by_ref().take(self.batch_size).collect();
            match self.store.insert_batch(chunk).await {
                Ok(rows) => {
                    for row in &rows {
                        info!(
                            resource_type = self.resource_type.as_str(),
                            lcuuid = row.logical_id(),
                            id = row.surrogate_key(),
                            "added resource"
                        );
                    }
                    inserted.extend(rows);
                }
                Err(e) if e.is_connectivity() => return Err(e.into()),
                Err(e) => {
                    warn!(
                        resource_type = self.resource_type.as_str(),
                        error = %e,
                        "insert batch failed, will retry next pass"
                    );
                }
            }
        }
        Ok(inserted)
    }

    /// Applies a field-level update to one row. Returns whether the store
    /// confirmed the write; a non-connectivity failure yields `false`.
    pub async fn update(&self, logical_id: &str, changes: &FieldChanges) -> RecorderResult<bool> {
        match self.store.update_fields(logical_id, changes).await {
            Ok(()) => {
                info!(
                    resource_type = self.resource_type.as_str(),
                    lcuuid = logical_id,
                    columns = ?changes.columns(),
                    "updated resource"
                );
                Ok(true)
            }
            Err(e) if e.is_connectivity() => Err(e.into()),
            Err(e) => {
                warn!(
                    resource_type = self.resource_type.as_str(),
                    lcuuid = logical_id,
                    error = %e,
                    "update failed, will retry next pass"
                );
                Ok(false)
            }
        }
    }

    /// Deletes rows by logical ID. Soft-delete types are tombstoned by the
    /// store implementation. Returns whether the store confirmed the batch.
    pub async fn delete_batch(&self, logical_ids: &[String]) -> RecorderResult<bool> {
        if logical_ids.is_empty() {
            return Ok(true);
        }
        match self.store.delete_batch(logical_ids).await {
            Ok(()) => {
                for lcuuid in logical_ids {
                    info!(
                        resource_type = self.resource_type.as_str(),
                        lcuuid = lcuuid.as_str(),
                        "deleted resource"
                    );
                }
                Ok(true)
            }
            Err(e) if e.is_connectivity() => Err(e.into()),
            Err(e) => {
                warn!(
                    resource_type = self.resource_type.as_str(),
                    error = %e,
                    "delete batch failed, will retry next pass"
                );
                Ok(false)
            }
        }
    }

    /// Reads every live row for this type, used for warm start and for
    /// projection diffing.
    pub async fn fetch_all(&self) -> RecorderResult<Vec<R>> {
        Ok(self.store.fetch_all().await?)
    }
}

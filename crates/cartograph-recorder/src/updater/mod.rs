//! Generic diff/apply reconciler.
//!
//! One `Updater` exists per resource type, parameterized by a strategy
//! that supplies the type-specific hooks: reference resolution, scalar
//! comparison and cache bookkeeping. The algorithm itself is written once
//! and shared by every type.
//!
//! Ordering discipline: the store is written first, the cache second, and
//! the cache is only mutated after the store confirmed the write. A batch
//! that fails leaves both sides untouched for its items and self-heals on
//! the next pass.

mod az;
mod floating_ip;
mod lan_ip;
mod network;
mod pod;
mod pod_cluster;
mod pod_group;
mod pod_namespace;
mod pod_node;
mod pod_service;
mod pod_service_port;
mod region;
mod vinterface;
mod vm;
mod vm_pod_node_connection;
mod vpc;

pub use az::AzStrategy;
pub use floating_ip::FloatingIpStrategy;
pub use lan_ip::LanIpStrategy;
pub use network::NetworkStrategy;
pub use pod::PodStrategy;
pub use pod_cluster::PodClusterStrategy;
pub use pod_group::PodGroupStrategy;
pub use pod_namespace::PodNamespaceStrategy;
pub use pod_node::PodNodeStrategy;
pub use pod_service::PodServiceStrategy;
pub use pod_service_port::PodServicePortStrategy;
pub use region::RegionStrategy;
pub use vinterface::VinterfaceStrategy;
pub use vm::VmStrategy;
pub use vm_pod_node_connection::VmPodNodeConnectionStrategy;
pub use vpc::VpcStrategy;

use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use tracing::warn;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::{FieldChanges, StoreRow};

use crate::cache::{Cache, DiffMap, HasDiffBase};
use crate::error::RecorderResult;
use crate::operator::Operator;

/// A snapshot item referenced a resource the cross-reference index does
/// not know yet. The item is dropped for this pass and retried once its
/// dependency has been reconciled.
#[derive(Debug, Clone)]
pub struct UnresolvedReference {
    pub target_type: ResourceType,
    pub target_id: LogicalId,
}

impl UnresolvedReference {
    pub fn new(target_type: ResourceType, target_id: &LogicalId) -> Self {
        Self {
            target_type,
            target_id: target_id.clone(),
        }
    }
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} not in cache", self.target_type.as_str(), self.target_id)
    }
}

/// Per-type reconciliation counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Items skipped because a referenced resource was not resolvable.
    pub unresolved: usize,
    /// Items skipped because the logical ID was empty.
    pub malformed: usize,
}

impl TypeCounts {
    /// True when the pass touched nothing for this type.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }

    /// Folds another counter set into this one.
    pub fn absorb(&mut self, other: TypeCounts) {
        self.added += other.added;
        self.updated += other.updated;
        self.deleted += other.deleted;
        self.unresolved += other.unresolved;
        self.malformed += other.malformed;
    }
}

/// Type-specific hooks driving the generic algorithm.
#[async_trait]
pub trait UpdaterStrategy: Send + Sync {
    /// Snapshot item type delivered by collectors.
    type Item: Clone + Send + Sync;
    /// Cached diff-base type.
    type Base: HasDiffBase + Clone + Send + Sync;
    /// Store row type.
    type Row: StoreRow;

    fn resource_type(&self) -> ResourceType;

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId;

    /// The diff-base map this type owns inside the cache.
    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base>;

    /// Builds a store row from a snapshot item, resolving every reference
    /// through the tool data set.
    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference>;

    /// Compares the mutable scalars of a cached diff base against the
    /// incoming item. An empty result means no store write.
    fn update_diff(&self, base: &Self::Base, item: &Self::Item) -> FieldChanges;

    /// Records freshly inserted rows in the diff-base map and tool data
    /// set. Called only after the store confirmed the insert.
    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]);

    /// Refreshes the diff base of an updated item in place. Called only
    /// after the store confirmed the update.
    fn update_cache(&self, cache: &Cache, item: &Self::Item);

    /// Drops deleted entries from the diff-base map and tool data set.
    /// Called only after the store confirmed the delete.
    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]);

    /// Cascade hook running before the primary delete. Best effort: a
    /// failure is logged by the caller and the primary delete proceeds.
    async fn before_delete(&self, _cache: &Cache, _ids: &[LogicalId]) -> RecorderResult<()> {
        Ok(())
    }
}

/// The shared diff/apply engine for one resource type.
pub struct Updater<S: UpdaterStrategy> {
    strategy: S,
    operator: Operator<S::Row>,
}

impl<S: UpdaterStrategy> Updater<S> {
    pub fn new(strategy: S, operator: Operator<S::Row>) -> Self {
        Self { strategy, operator }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn operator(&self) -> &Operator<S::Row> {
        &self.operator
    }

    /// Add/update phase. Splits the snapshot items into adds (absent from
    /// the cache) and updates (present with a non-empty scalar diff),
    /// applies both through the store, then mirrors confirmed writes into
    /// the cache. Every item seen in this pass gets the current generation
    /// sequence stamped on its diff base.
    pub async fn handle_add_and_update(
        &self,
        cache: &Cache,
        items: &[S::Item],
    ) -> RecorderResult<TypeCounts> {
        let sequence = cache.sequence();
        let diff_map = self.strategy.diff_map(cache);
        let mut counts = TypeCounts::default();
        let mut to_add: Vec<S::Row> = Vec::new();
        let mut to_update: Vec<(LogicalId, FieldChanges, S::Item)> = Vec::new();

        for item in items {
            let id = self.strategy.logical_id(item);
            if id.is_empty() {
                warn!(
                    resource_type = self.strategy.resource_type().as_str(),
                    "skipping item with empty logical ID"
                );
                counts.malformed += 1;
                continue;
            }
            match diff_map.get_cloned(id) {
                None => match self.strategy.build_row(cache, item) {
                    Ok(row) => to_add.push(row),
                    Err(unresolved) => {
                        warn!(
                            resource_type = self.strategy.resource_type().as_str(),
                            lcuuid = id.as_str(),
                            reference = %unresolved,
                            "skipping item with unresolved reference, retrying next pass"
                        );
                        counts.unresolved += 1;
                    }
                },
                Some(base) => {
                    let changes = self.strategy.update_diff(&base, item);
                    diff_map.update_with(id, |b| b.base_mut().sequence = sequence);
                    if !changes.is_empty() {
                        to_update.push((id.clone(), changes, item.clone()));
                    }
                }
            }
        }

        if !to_add.is_empty() {
            let inserted = self.operator.add_batch(to_add).await?;
            counts.added = inserted.len();
            self.strategy.add_to_cache(cache, &inserted);
        }
        for (id, changes, item) in to_update {
            if self.operator.update(id.as_str(), &changes).await? {
                self.strategy.update_cache(cache, &item);
                counts.updated += 1;
            }
        }
        Ok(counts)
    }

    /// Delete phase. Cached entries missing from the snapshot are removed,
    /// store first, cache second. The strategy's cascade hook runs before
    /// the primary delete.
    pub async fn handle_delete(&self, cache: &Cache, items: &[S::Item]) -> RecorderResult<usize> {
        let present: HashSet<LogicalId> = items
            .iter()
            .map(|item| self.strategy.logical_id(item).clone())
            .collect();
        let stale = self.strategy.diff_map(cache).ids_missing_from(&present);
        if stale.is_empty() {
            return Ok(0);
        }

        if let Err(e) = self.strategy.before_delete(cache, &stale).await {
            warn!(
                resource_type = self.strategy.resource_type().as_str(),
                error = %e,
                "cascade cleanup failed, proceeding with primary delete"
            );
        }

        let id_strings: Vec<String> = stale.iter().map(|id| id.as_str().to_string()).collect();
        if self.operator.delete_batch(&id_strings).await? {
            self.strategy.delete_from_cache(cache, &stale);
            Ok(stale.len())
        } else {
            Ok(0)
        }
    }
}

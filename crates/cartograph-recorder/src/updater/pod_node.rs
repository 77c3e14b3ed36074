//! Pod-node reconciliation strategy. Soft-deletable.
//!
//! Deleting a node cascades to the vm_pod_node_connection join rows that
//! reference it, store and cache both, before the node rows themselves go.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::{PodNodeRow, VmPodNodeConnectionRow};
use cartograph_db::{FieldChanges, ResourceStore};

use crate::cache::{Cache, DiffMap, PodNodeDiffBase};
use crate::error::RecorderResult;
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct PodNodeStrategy {
    connection_store: Arc<dyn ResourceStore<VmPodNodeConnectionRow>>,
}

impl PodNodeStrategy {
    pub fn new(connection_store: Arc<dyn ResourceStore<VmPodNodeConnectionRow>>) -> Self {
        Self { connection_store }
    }
}

#[async_trait]
impl UpdaterStrategy for PodNodeStrategy {
    type Item = snapshot::PodNode;
    type Base = PodNodeDiffBase;
    type Row = PodNodeRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::PodNode
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.pod_nodes
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        let pod_cluster_id = cache
            .tool
            .pod_cluster_id_by_lcuuid(item.pod_cluster_lcuuid.as_str())
            .ok_or_else(|| {
                UnresolvedReference::new(ResourceType::PodCluster, &item.pod_cluster_lcuuid)
            })?;
        Ok(PodNodeRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            name: item.name.clone(),
            state: item.state,
            pod_cluster_id,
            az: item.az_lcuuid.as_str().to_string(),
            region: item.region_lcuuid.as_str().to_string(),
            deleted_at: None,
        })
    }

    fn update_diff(&self, base: &Self::Base, item: &Self::Item) -> FieldChanges {
        let mut changes = FieldChanges::new();
        if base.name != item.name {
            changes.set("name", item.name.clone());
        }
        if base.state != item.state {
            changes.set("state", item.state);
        }
        if base.az != item.az_lcuuid.as_str() {
            changes.set("az", item.az_lcuuid.as_str());
        }
        if base.region != item.region_lcuuid.as_str() {
            changes.set("region", item.region_lcuuid.as_str());
        }
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.pod_nodes.insert_batch(
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), PodNodeDiffBase::from_row(r, sequence)))
                .collect(),
        );
        cache
            .tool
            .add_pod_nodes(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.set_names(
            ResourceType::PodNode,
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.name.clone()))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.pod_nodes.update_with(&item.lcuuid, |b| b.update(item));
        cache.tool.set_names(
            ResourceType::PodNode,
            vec![(item.lcuuid.clone(), item.name.clone())],
        );
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.pod_nodes.remove_batch(ids);
        cache.tool.delete_pod_nodes(ids);
        cache.tool.delete_names(ResourceType::PodNode, ids);
    }

    async fn before_delete(&self, cache: &Cache, ids: &[LogicalId]) -> RecorderResult<()> {
        let node_keys: HashSet<i32> = ids
            .iter()
            .filter_map(|id| cache.tool.pod_node_id_by_lcuuid(id.as_str()))
            .collect();
        if node_keys.is_empty() {
            return Ok(());
        }

        let connections = self.connection_store.fetch_all().await?;
        let doomed: Vec<String> = connections
            .iter()
            .filter(|c| node_keys.contains(&c.pod_node_id))
            .map(|c| c.lcuuid.clone())
            .collect();
        if doomed.is_empty() {
            return Ok(());
        }

        self.connection_store.delete_batch(&doomed).await?;
        let doomed_ids: Vec<LogicalId> = doomed.into_iter().map(LogicalId::new).collect();
        cache.vm_pod_node_connections.remove_batch(&doomed_ids);
        cache.tool.delete_vm_pod_node_connections(&doomed_ids);
        info!(
            count = doomed_ids.len(),
            "cascaded connection cleanup for deleted pod nodes"
        );
        Ok(())
    }
}

//! Pod reconciliation strategy. Soft-deletable; resolves four references,
//! the deepest dependency chain in the graph.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::PodRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, PodDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct PodStrategy;

#[async_trait]
impl UpdaterStrategy for PodStrategy {
    type Item = snapshot::Pod;
    type Base = PodDiffBase;
    type Row = PodRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::Pod
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.pods
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        let pod_group_id = cache
            .tool
            .pod_group_id_by_lcuuid(item.pod_group_lcuuid.as_str())
            .ok_or_else(|| {
                UnresolvedReference::new(ResourceType::PodGroup, &item.pod_group_lcuuid)
            })?;
        let pod_node_id = cache
            .tool
            .pod_node_id_by_lcuuid(item.pod_node_lcuuid.as_str())
            .ok_or_else(|| {
                UnresolvedReference::new(ResourceType::PodNode, &item.pod_node_lcuuid)
            })?;
        let pod_namespace_id = cache
            .tool
            .pod_namespace_id_by_lcuuid(item.pod_namespace_lcuuid.as_str())
            .ok_or_else(|| {
                UnresolvedReference::new(ResourceType::PodNamespace, &item.pod_namespace_lcuuid)
            })?;
        let pod_cluster_id = cache
            .tool
            .pod_cluster_id_by_lcuuid(item.pod_cluster_lcuuid.as_str())
            .ok_or_else(|| {
                UnresolvedReference::new(ResourceType::PodCluster, &item.pod_cluster_lcuuid)
            })?;
        Ok(PodRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            name: item.name.clone(),
            state: item.state,
            pod_group_id,
            pod_node_id,
            pod_namespace_id,
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
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.pods.insert_batch(
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), PodDiffBase::from_row(r, sequence)))
                .collect(),
        );
        cache
            .tool
            .add_pods(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.set_names(
            ResourceType::Pod,
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.name.clone()))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.pods.update_with(&item.lcuuid, |b| b.update(item));
        cache.tool.set_names(
            ResourceType::Pod,
            vec![(item.lcuuid.clone(), item.name.clone())],
        );
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.pods.remove_batch(ids);
        cache.tool.delete_pods(ids);
        cache.tool.delete_names(ResourceType::Pod, ids);
    }
}

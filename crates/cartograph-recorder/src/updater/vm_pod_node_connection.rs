//! Join-table strategy linking compute instances to the pod nodes they
//! host. Join rows have no mutable scalars, so the update diff is always
//! empty; only adds and hard deletes occur.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::VmPodNodeConnectionRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, VmPodNodeConnectionDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct VmPodNodeConnectionStrategy;

#[async_trait]
impl UpdaterStrategy for VmPodNodeConnectionStrategy {
    type Item = snapshot::VmPodNodeConnection;
    type Base = VmPodNodeConnectionDiffBase;
    type Row = VmPodNodeConnectionRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::VmPodNodeConnection
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.vm_pod_node_connections
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        let vm_id = cache
            .tool
            .vm_id_by_lcuuid(item.vm_lcuuid.as_str())
            .ok_or_else(|| UnresolvedReference::new(ResourceType::Vm, &item.vm_lcuuid))?;
        let pod_node_id = cache
            .tool
            .pod_node_id_by_lcuuid(item.pod_node_lcuuid.as_str())
            .ok_or_else(|| {
                UnresolvedReference::new(ResourceType::PodNode, &item.pod_node_lcuuid)
            })?;
        Ok(VmPodNodeConnectionRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            vm_id,
            pod_node_id,
        })
    }

    fn update_diff(&self, _base: &Self::Base, _item: &Self::Item) -> FieldChanges {
        FieldChanges::new()
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.vm_pod_node_connections.insert_batch(
            rows.iter()
                .map(|r| {
                    (
                        LogicalId::new(r.lcuuid.clone()),
                        VmPodNodeConnectionDiffBase::from_row(r, sequence),
                    )
                })
                .collect(),
        );
        cache.tool.add_vm_pod_node_connections(
            rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect(),
        );
    }

    fn update_cache(&self, _cache: &Cache, _item: &Self::Item) {}

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.vm_pod_node_connections.remove_batch(ids);
        cache.tool.delete_vm_pod_node_connections(ids);
    }
}

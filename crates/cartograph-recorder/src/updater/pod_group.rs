//! Workload-controller reconciliation strategy.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::PodGroupRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, PodGroupDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct PodGroupStrategy;

#[async_trait]
impl UpdaterStrategy for PodGroupStrategy {
    type Item = snapshot::PodGroup;
    type Base = PodGroupDiffBase;
    type Row = PodGroupRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::PodGroup
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.pod_groups
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
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
        Ok(PodGroupRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            name: item.name.clone(),
            label: item.label.clone(),
            pod_num: item.pod_num,
            pod_namespace_id,
            pod_cluster_id,
            az: item.az_lcuuid.as_str().to_string(),
            region: item.region_lcuuid.as_str().to_string(),
        })
    }

    fn update_diff(&self, base: &Self::Base, item: &Self::Item) -> FieldChanges {
        let mut changes = FieldChanges::new();
        if base.name != item.name {
            changes.set("name", item.name.clone());
        }
        if base.label != item.label {
            changes.set("label", item.label.clone());
        }
        if base.pod_num != item.pod_num {
            changes.set("pod_num", item.pod_num);
        }
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.pod_groups.insert_batch(
            rows.iter()
                .map(|r| {
                    (LogicalId::new(r.lcuuid.clone()), PodGroupDiffBase::from_row(r, sequence))
                })
                .collect(),
        );
        cache
            .tool
            .add_pod_groups(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.set_names(
            ResourceType::PodGroup,
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.name.clone()))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.pod_groups.update_with(&item.lcuuid, |b| b.update(item));
        cache.tool.set_names(
            ResourceType::PodGroup,
            vec![(item.lcuuid.clone(), item.name.clone())],
        );
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.pod_groups.remove_batch(ids);
        cache.tool.delete_pod_groups(ids);
        cache.tool.delete_names(ResourceType::PodGroup, ids);
    }
}

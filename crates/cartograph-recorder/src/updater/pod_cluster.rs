//! Pod-cluster reconciliation strategy.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::PodClusterRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, PodClusterDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct PodClusterStrategy;

#[async_trait]
impl UpdaterStrategy for PodClusterStrategy {
    type Item = snapshot::PodCluster;
    type Base = PodClusterDiffBase;
    type Row = PodClusterRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::PodCluster
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.pod_clusters
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        Ok(PodClusterRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            name: item.name.clone(),
            az: item.az_lcuuid.as_str().to_string(),
            region: item.region_lcuuid.as_str().to_string(),
        })
    }

    fn update_diff(&self, base: &Self::Base, item: &Self::Item) -> FieldChanges {
        let mut changes = FieldChanges::new();
        if base.name != item.name {
            changes.set("name", item.name.clone());
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
        cache.pod_clusters.insert_batch(
            rows.iter()
                .map(|r| {
                    (LogicalId::new(r.lcuuid.clone()), PodClusterDiffBase::from_row(r, sequence))
                })
                .collect(),
        );
        cache
            .tool
            .add_pod_clusters(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.set_names(
            ResourceType::PodCluster,
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.name.clone()))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.pod_clusters.update_with(&item.lcuuid, |b| b.update(item));
        cache.tool.set_names(
            ResourceType::PodCluster,
            vec![(item.lcuuid.clone(), item.name.clone())],
        );
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.pod_clusters.remove_batch(ids);
        cache.tool.delete_pod_clusters(ids);
        cache.tool.delete_names(ResourceType::PodCluster, ids);
    }
}

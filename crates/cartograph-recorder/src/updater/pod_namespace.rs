//! Namespace reconciliation strategy.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::PodNamespaceRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, PodNamespaceDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct PodNamespaceStrategy;

#[async_trait]
impl UpdaterStrategy for PodNamespaceStrategy {
    type Item = snapshot::PodNamespace;
    type Base = PodNamespaceDiffBase;
    type Row = PodNamespaceRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::PodNamespace
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.pod_namespaces
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
        Ok(PodNamespaceRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            name: item.name.clone(),
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
        cache.pod_namespaces.insert_batch(
            rows.iter()
                .map(|r| {
                    (LogicalId::new(r.lcuuid.clone()), PodNamespaceDiffBase::from_row(r, sequence))
                })
                .collect(),
        );
        cache
            .tool
            .add_pod_namespaces(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.set_names(
            ResourceType::PodNamespace,
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.name.clone()))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.pod_namespaces.update_with(&item.lcuuid, |b| b.update(item));
        cache.tool.set_names(
            ResourceType::PodNamespace,
            vec![(item.lcuuid.clone(), item.name.clone())],
        );
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.pod_namespaces.remove_batch(ids);
        cache.tool.delete_pod_namespaces(ids);
        cache.tool.delete_names(ResourceType::PodNamespace, ids);
    }
}

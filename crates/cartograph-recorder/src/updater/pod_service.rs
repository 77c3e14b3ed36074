//! Service reconciliation strategy. Soft-deletable.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::PodServiceRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, PodServiceDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct PodServiceStrategy;

#[async_trait]
impl UpdaterStrategy for PodServiceStrategy {
    type Item = snapshot::PodService;
    type Base = PodServiceDiffBase;
    type Row = PodServiceRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::PodService
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.pod_services
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
        Ok(PodServiceRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            name: item.name.clone(),
            service_cluster_ip: item.service_cluster_ip.clone(),
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
        if base.service_cluster_ip != item.service_cluster_ip {
            changes.set("service_cluster_ip", item.service_cluster_ip.clone());
        }
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.pod_services.insert_batch(
            rows.iter()
                .map(|r| {
                    (LogicalId::new(r.lcuuid.clone()), PodServiceDiffBase::from_row(r, sequence))
                })
                .collect(),
        );
        cache
            .tool
            .add_pod_services(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.set_names(
            ResourceType::PodService,
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.name.clone()))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.pod_services.update_with(&item.lcuuid, |b| b.update(item));
        cache.tool.set_names(
            ResourceType::PodService,
            vec![(item.lcuuid.clone(), item.name.clone())],
        );
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.pod_services.remove_batch(ids);
        cache.tool.delete_pod_services(ids);
        cache.tool.delete_names(ResourceType::PodService, ids);
    }
}

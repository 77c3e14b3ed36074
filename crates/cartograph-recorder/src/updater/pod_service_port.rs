//! Service-port reconciliation strategy.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::PodServicePortRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, PodServicePortDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct PodServicePortStrategy;

#[async_trait]
impl UpdaterStrategy for PodServicePortStrategy {
    type Item = snapshot::PodServicePort;
    type Base = PodServicePortDiffBase;
    type Row = PodServicePortRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::PodServicePort
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.pod_service_ports
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        let pod_service_id = cache
            .tool
            .pod_service_id_by_lcuuid(item.pod_service_lcuuid.as_str())
            .ok_or_else(|| {
                UnresolvedReference::new(ResourceType::PodService, &item.pod_service_lcuuid)
            })?;
        Ok(PodServicePortRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            name: item.name.clone(),
            protocol: item.protocol.clone(),
            port: item.port,
            node_port: item.node_port,
            pod_service_id,
        })
    }

    fn update_diff(&self, base: &Self::Base, item: &Self::Item) -> FieldChanges {
        let mut changes = FieldChanges::new();
        if base.name != item.name {
            changes.set("name", item.name.clone());
        }
        if base.protocol != item.protocol {
            changes.set("protocol", item.protocol.clone());
        }
        if base.port != item.port {
            changes.set("port", item.port);
        }
        if base.node_port != item.node_port {
            changes.set("node_port", item.node_port);
        }
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.pod_service_ports.insert_batch(
            rows.iter()
                .map(|r| {
                    (
                        LogicalId::new(r.lcuuid.clone()),
                        PodServicePortDiffBase::from_row(r, sequence),
                    )
                })
                .collect(),
        );
        cache.tool.add_pod_service_ports(
            rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.pod_service_ports.update_with(&item.lcuuid, |b| b.update(item));
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.pod_service_ports.remove_batch(ids);
        cache.tool.delete_pod_service_ports(ids);
    }
}

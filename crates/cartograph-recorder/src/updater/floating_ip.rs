//! Floating-IP reconciliation strategy.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::FloatingIpRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, FloatingIpDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct FloatingIpStrategy;

#[async_trait]
impl UpdaterStrategy for FloatingIpStrategy {
    type Item = snapshot::FloatingIp;
    type Base = FloatingIpDiffBase;
    type Row = FloatingIpRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::FloatingIp
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.floating_ips
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        let network_id = cache
            .tool
            .network_id_by_lcuuid(item.network_lcuuid.as_str())
            .ok_or_else(|| UnresolvedReference::new(ResourceType::Network, &item.network_lcuuid))?;
        let vpc_id = cache
            .tool
            .vpc_id_by_lcuuid(item.vpc_lcuuid.as_str())
            .ok_or_else(|| UnresolvedReference::new(ResourceType::Vpc, &item.vpc_lcuuid))?;
        let vm_id = cache
            .tool
            .vm_id_by_lcuuid(item.vm_lcuuid.as_str())
            .ok_or_else(|| UnresolvedReference::new(ResourceType::Vm, &item.vm_lcuuid))?;
        Ok(FloatingIpRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            ip: item.ip.clone(),
            network_id,
            vpc_id,
            vm_id,
            region: item.region_lcuuid.as_str().to_string(),
        })
    }

    fn update_diff(&self, base: &Self::Base, item: &Self::Item) -> FieldChanges {
        let mut changes = FieldChanges::new();
        if base.region != item.region_lcuuid.as_str() {
            changes.set("region", item.region_lcuuid.as_str());
        }
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.floating_ips.insert_batch(
            rows.iter()
                .map(|r| {
                    (LogicalId::new(r.lcuuid.clone()), FloatingIpDiffBase::from_row(r, sequence))
                })
                .collect(),
        );
        cache
            .tool
            .add_floating_ips(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.floating_ips.update_with(&item.lcuuid, |b| b.update(item));
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.floating_ips.remove_batch(ids);
        cache.tool.delete_floating_ips(ids);
    }
}

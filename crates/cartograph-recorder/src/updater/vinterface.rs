//! Virtual-interface reconciliation strategy.
//!
//! Besides the usual bookkeeping this strategy maintains the derived
//! interface-to-network index that IP types use to resolve the network
//! they ultimately belong to.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::VinterfaceRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, VinterfaceDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct VinterfaceStrategy;

#[async_trait]
impl UpdaterStrategy for VinterfaceStrategy {
    type Item = snapshot::Vinterface;
    type Base = VinterfaceDiffBase;
    type Row = VinterfaceRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::Vinterface
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.vinterfaces
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
        let device_id = cache
            .tool
            .vm_id_by_lcuuid(item.vm_lcuuid.as_str())
            .ok_or_else(|| UnresolvedReference::new(ResourceType::Vm, &item.vm_lcuuid))?;
        Ok(VinterfaceRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            mac: item.mac.clone(),
            network_id,
            device_id,
            region: item.region_lcuuid.as_str().to_string(),
        })
    }

    fn update_diff(&self, base: &Self::Base, item: &Self::Item) -> FieldChanges {
        let mut changes = FieldChanges::new();
        if base.mac != item.mac {
            changes.set("mac", item.mac.clone());
        }
        if base.region != item.region_lcuuid.as_str() {
            changes.set("region", item.region_lcuuid.as_str());
        }
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.vinterfaces.insert_batch(
            rows.iter()
                .map(|r| {
                    (LogicalId::new(r.lcuuid.clone()), VinterfaceDiffBase::from_row(r, sequence))
                })
                .collect(),
        );
        cache
            .tool
            .add_vinterfaces(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.add_vinterface_networks(
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.network_id))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.vinterfaces.update_with(&item.lcuuid, |b| b.update(item));
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.vinterfaces.remove_batch(ids);
        cache.tool.delete_vinterfaces(ids);
        cache.tool.delete_vinterface_networks(ids);
    }
}

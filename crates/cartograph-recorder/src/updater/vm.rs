//! Compute-instance reconciliation strategy. Soft-deletable.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::VmRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, VmDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct VmStrategy;

#[async_trait]
impl UpdaterStrategy for VmStrategy {
    type Item = snapshot::Vm;
    type Base = VmDiffBase;
    type Row = VmRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::Vm
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.vms
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        let vpc_id = cache
            .tool
            .vpc_id_by_lcuuid(item.vpc_lcuuid.as_str())
            .ok_or_else(|| UnresolvedReference::new(ResourceType::Vpc, &item.vpc_lcuuid))?;
        Ok(VmRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            name: item.name.clone(),
            label: item.label.clone(),
            state: item.state,
            vpc_id,
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
        if base.label != item.label {
            changes.set("label", item.label.clone());
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
        cache.vms.insert_batch(
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), VmDiffBase::from_row(r, sequence)))
                .collect(),
        );
        cache
            .tool
            .add_vms(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.set_names(
            ResourceType::Vm,
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.name.clone()))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.vms.update_with(&item.lcuuid, |b| b.update(item));
        cache.tool.set_names(
            ResourceType::Vm,
            vec![(item.lcuuid.clone(), item.name.clone())],
        );
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.vms.remove_batch(ids);
        cache.tool.delete_vms(ids);
        cache.tool.delete_names(ResourceType::Vm, ids);
    }
}

//! VPC reconciliation strategy.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::VpcRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, VpcDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct VpcStrategy;

#[async_trait]
impl UpdaterStrategy for VpcStrategy {
    type Item = snapshot::Vpc;
    type Base = VpcDiffBase;
    type Row = VpcRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::Vpc
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.vpcs
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        Ok(VpcRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            name: item.name.clone(),
            region: item.region_lcuuid.as_str().to_string(),
        })
    }

    fn update_diff(&self, base: &Self::Base, item: &Self::Item) -> FieldChanges {
        let mut changes = FieldChanges::new();
        if base.name != item.name {
            changes.set("name", item.name.clone());
        }
        if base.region != item.region_lcuuid.as_str() {
            changes.set("region", item.region_lcuuid.as_str());
        }
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.vpcs.insert_batch(
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), VpcDiffBase::from_row(r, sequence)))
                .collect(),
        );
        cache
            .tool
            .add_vpcs(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.set_names(
            ResourceType::Vpc,
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.name.clone()))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.vpcs.update_with(&item.lcuuid, |b| b.update(item));
        cache.tool.set_names(
            ResourceType::Vpc,
            vec![(item.lcuuid.clone(), item.name.clone())],
        );
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.vpcs.remove_batch(ids);
        cache.tool.delete_vpcs(ids);
        cache.tool.delete_names(ResourceType::Vpc, ids);
    }
}

//! Region reconciliation strategy. Regions sit at the root of the
//! dependency graph and reference nothing.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::RegionRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, RegionDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct RegionStrategy;

#[async_trait]
impl UpdaterStrategy for RegionStrategy {
    type Item = snapshot::Region;
    type Base = RegionDiffBase;
    type Row = RegionRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::Region
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.regions
    }

    fn build_row(
        &self,
        _cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        Ok(RegionRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            name: item.name.clone(),
        })
    }

    fn update_diff(&self, base: &Self::Base, item: &Self::Item) -> FieldChanges {
        let mut changes = FieldChanges::new();
        if base.name != item.name {
            changes.set("name", item.name.clone());
        }
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.regions.insert_batch(
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), RegionDiffBase::from_row(r, sequence)))
                .collect(),
        );
        cache
            .tool
            .add_regions(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.set_names(
            ResourceType::Region,
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.name.clone()))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.regions.update_with(&item.lcuuid, |b| b.update(item));
        cache.tool.set_names(
            ResourceType::Region,
            vec![(item.lcuuid.clone(), item.name.clone())],
        );
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.regions.remove_batch(ids);
        cache.tool.delete_regions(ids);
        cache.tool.delete_names(ResourceType::Region, ids);
    }
}

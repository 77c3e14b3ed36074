//! Availability-zone reconciliation strategy. The region reference is a
//! scope field stored as a logical ID, so building a row never fails.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::AzRow;
use cartograph_db::FieldChanges;

use crate::cache::{AzDiffBase, Cache, DiffMap};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct AzStrategy;

#[async_trait]
impl UpdaterStrategy for AzStrategy {
    type Item = snapshot::Az;
    type Base = AzDiffBase;
    type Row = AzRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::Az
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.azs
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        Ok(AzRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            name: item.name.clone(),
            label: item.label.clone(),
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
        if base.region != item.region_lcuuid.as_str() {
            changes.set("region", item.region_lcuuid.as_str());
        }
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.azs.insert_batch(
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), AzDiffBase::from_row(r, sequence)))
                .collect(),
        );
        cache
            .tool
            .add_azs(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
        cache.tool.set_names(
            ResourceType::Az,
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), r.name.clone()))
                .collect(),
        );
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.azs.update_with(&item.lcuuid, |b| b.update(item));
        cache.tool.set_names(
            ResourceType::Az,
            vec![(item.lcuuid.clone(), item.name.clone())],
        );
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.azs.remove_batch(ids);
        cache.tool.delete_azs(ids);
        cache.tool.delete_names(ResourceType::Az, ids);
    }
}

//! Private-IP reconciliation strategy. The network is not referenced
//! directly by the snapshot item; it is derived from the owning interface
//! through the tool data set.

use async_trait::async_trait;

use cartograph_core::{LogicalId, ResourceType};
use cartograph_db::models::LanIpRow;
use cartograph_db::FieldChanges;

use crate::cache::{Cache, DiffMap, LanIpDiffBase};
use crate::snapshot;
use crate::updater::{UnresolvedReference, UpdaterStrategy};

pub struct LanIpStrategy;

#[async_trait]
impl UpdaterStrategy for LanIpStrategy {
    type Item = snapshot::LanIp;
    type Base = LanIpDiffBase;
    type Row = LanIpRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::LanIp
    }

    fn logical_id<'a>(&self, item: &'a Self::Item) -> &'a LogicalId {
        &item.lcuuid
    }

    fn diff_map<'a>(&self, cache: &'a Cache) -> &'a DiffMap<Self::Base> {
        &cache.lan_ips
    }

    fn build_row(
        &self,
        cache: &Cache,
        item: &Self::Item,
    ) -> Result<Self::Row, UnresolvedReference> {
        let vinterface_id = cache
            .tool
            .vinterface_id_by_lcuuid(item.vinterface_lcuuid.as_str())
            .ok_or_else(|| {
                UnresolvedReference::new(ResourceType::Vinterface, &item.vinterface_lcuuid)
            })?;
        let network_id = cache
            .tool
            .network_id_by_vinterface(item.vinterface_lcuuid.as_str())
            .ok_or_else(|| {
                UnresolvedReference::new(ResourceType::Vinterface, &item.vinterface_lcuuid)
            })?;
        Ok(LanIpRow {
            id: 0,
            lcuuid: item.lcuuid.as_str().to_string(),
            domain: cache.scope().domain.as_str().to_string(),
            ip: item.ip.clone(),
            vinterface_id,
            network_id,
        })
    }

    fn update_diff(&self, base: &Self::Base, item: &Self::Item) -> FieldChanges {
        let mut changes = FieldChanges::new();
        if base.ip != item.ip {
            changes.set("ip", item.ip.clone());
        }
        changes
    }

    fn add_to_cache(&self, cache: &Cache, rows: &[Self::Row]) {
        let sequence = cache.sequence();
        cache.lan_ips.insert_batch(
            rows.iter()
                .map(|r| (LogicalId::new(r.lcuuid.clone()), LanIpDiffBase::from_row(r, sequence)))
                .collect(),
        );
        cache
            .tool
            .add_lan_ips(rows.iter().map(|r| (LogicalId::new(r.lcuuid.clone()), r.id)).collect());
    }

    fn update_cache(&self, cache: &Cache, item: &Self::Item) {
        cache.lan_ips.update_with(&item.lcuuid, |b| b.update(item));
    }

    fn delete_from_cache(&self, cache: &Cache, ids: &[LogicalId]) {
        cache.lan_ips.remove_batch(ids);
        cache.tool.delete_lan_ips(ids);
    }
}

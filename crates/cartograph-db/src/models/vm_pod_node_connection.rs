//! Compute-instance / pod-node join row model.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// Join row linking a compute instance to the pod node it hosts.
/// Hard-deleted, and cascaded away when its pod node is deleted.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct VmPodNodeConnectionRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Owning domain.
    pub domain: String,
    /// Surrogate key of the compute instance. Immutable once set.
    pub vm_id: i32,
    /// Surrogate key of the pod node. Immutable once set.
    pub pod_node_id: i32,
}

super::impl_store_row!(VmPodNodeConnectionRow, "vm_pod_node_connection");

impl PgBind for VmPodNodeConnectionRow {
    fn insert_columns() -> &'static [&'static str] {
        &["lcuuid", "domain", "vm_id", "pod_node_id"]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.domain.clone());
        b.push_bind(self.vm_id);
        b.push_bind(self.pod_node_id);
    }
}

//! Pod-group (workload) row model.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// A workload controller (deployment, daemonset...) in a namespace.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct PodGroupRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Owning domain.
    pub domain: String,
    /// Display name.
    pub name: String,
    /// Orchestrator labels, comma-joined.
    pub label: String,
    /// Desired replica count.
    pub pod_num: i32,
    /// Surrogate key of the owning namespace. Immutable once set.
    pub pod_namespace_id: i32,
    /// Surrogate key of the owning cluster. Immutable once set.
    pub pod_cluster_id: i32,
    /// Availability-zone logical ID.
    pub az: String,
    /// Region logical ID.
    pub region: String,
}

super::impl_store_row!(PodGroupRow, "pod_group");

impl PgBind for PodGroupRow {
    fn insert_columns() -> &'static [&'static str] {
        &[
            "lcuuid",
            "domain",
            "name",
            "label",
            "pod_num",
            "pod_namespace_id",
            "pod_cluster_id",
            "az",
            "region",
        ]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.domain.clone());
        b.push_bind(self.name.clone());
        b.push_bind(self.label.clone());
        b.push_bind(self.pod_num);
        b.push_bind(self.pod_namespace_id);
        b.push_bind(self.pod_cluster_id);
        b.push_bind(self.az.clone());
        b.push_bind(self.region.clone());
    }
}

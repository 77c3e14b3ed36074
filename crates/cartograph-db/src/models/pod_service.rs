//! Pod-service row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// A service exposing workloads within a cluster. Soft-deletable.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct PodServiceRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Owning domain.
    pub domain: String,
    /// Display name.
    pub name: String,
    /// Cluster-internal service address.
    pub service_cluster_ip: String,
    /// Surrogate key of the owning namespace. Immutable once set.
    pub pod_namespace_id: i32,
    /// Surrogate key of the owning cluster. Immutable once set.
    pub pod_cluster_id: i32,
    /// Availability-zone logical ID.
    pub az: String,
    /// Region logical ID.
    pub region: String,
    /// Tombstone timestamp.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

super::impl_store_row!(PodServiceRow, "pod_service", soft_delete);

impl PgBind for PodServiceRow {
    fn insert_columns() -> &'static [&'static str] {
        &[
            "lcuuid",
            "domain",
            "name",
            "service_cluster_ip",
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
        b.push_bind(self.service_cluster_ip.clone());
        b.push_bind(self.pod_namespace_id);
        b.push_bind(self.pod_cluster_id);
        b.push_bind(self.az.clone());
        b.push_bind(self.region.clone());
    }
}

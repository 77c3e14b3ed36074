//! Pod-cluster row model.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// A container-orchestrator cluster.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct PodClusterRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Owning domain.
    pub domain: String,
    /// Display name.
    pub name: String,
    /// Availability-zone logical ID.
    pub az: String,
    /// Region logical ID.
    pub region: String,
}

super::impl_store_row!(PodClusterRow, "pod_cluster");

impl PgBind for PodClusterRow {
    fn insert_columns() -> &'static [&'static str] {
        &["lcuuid", "domain", "name", "az", "region"]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.domain.clone());
        b.push_bind(self.name.clone());
        b.push_bind(self.az.clone());
        b.push_bind(self.region.clone());
    }
}

//! Compute-instance row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// A compute instance. Soft-deletable.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct VmRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Owning domain.
    pub domain: String,
    /// Display name.
    pub name: String,
    /// Provider label.
    pub label: String,
    /// Lifecycle state reported by the collector.
    pub state: i32,
    /// Surrogate key of the owning VPC. Immutable once set.
    pub vpc_id: i32,
    /// Availability-zone logical ID.
    pub az: String,
    /// Region logical ID.
    pub region: String,
    /// Tombstone timestamp.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

super::impl_store_row!(VmRow, "vm", soft_delete);

impl PgBind for VmRow {
    fn insert_columns() -> &'static [&'static str] {
        &["lcuuid", "domain", "name", "label", "state", "vpc_id", "az", "region"]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.domain.clone());
        b.push_bind(self.name.clone());
        b.push_bind(self.label.clone());
        b.push_bind(self.state);
        b.push_bind(self.vpc_id);
        b.push_bind(self.az.clone());
        b.push_bind(self.region.clone());
    }
}

//! Network (subnet) row model.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// A virtual network inside a VPC.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct NetworkRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Owning domain.
    pub domain: String,
    /// Display name.
    pub name: String,
    /// Surrogate key of the owning VPC. Immutable once set.
    pub vpc_id: i32,
    /// Availability-zone logical ID.
    pub az: String,
    /// Region logical ID.
    pub region: String,
}

super::impl_store_row!(NetworkRow, "network");

impl PgBind for NetworkRow {
    fn insert_columns() -> &'static [&'static str] {
        &["lcuuid", "domain", "name", "vpc_id", "az", "region"]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.domain.clone());
        b.push_bind(self.name.clone());
        b.push_bind(self.vpc_id);
        b.push_bind(self.az.clone());
        b.push_bind(self.region.clone());
    }
}

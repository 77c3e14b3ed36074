//! Availability-zone row model.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// An availability zone within a region.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct AzRow {
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
    /// Region logical ID. Scope field, stored as-is.
    pub region: String,
}

super::impl_store_row!(AzRow, "az");

impl PgBind for AzRow {
    fn insert_columns() -> &'static [&'static str] {
        &["lcuuid", "domain", "name", "label", "region"]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.domain.clone());
        b.push_bind(self.name.clone());
        b.push_bind(self.label.clone());
        b.push_bind(self.region.clone());
    }
}

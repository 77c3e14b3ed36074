//! Region row model.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// A cloud region.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct RegionRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Display name.
    pub name: String,
}

super::impl_store_row!(RegionRow, "region");

impl PgBind for RegionRow {
    fn insert_columns() -> &'static [&'static str] {
        &["lcuuid", "name"]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.name.clone());
    }
}

//! Virtual-interface row model.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// A virtual network interface attached to a compute instance.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct VinterfaceRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Owning domain.
    pub domain: String,
    /// MAC address.
    pub mac: String,
    /// Surrogate key of the attached network. Immutable once set.
    pub network_id: i32,
    /// Surrogate key of the owning compute instance. Immutable once set.
    pub device_id: i32,
    /// Region logical ID.
    pub region: String,
}

super::impl_store_row!(VinterfaceRow, "vinterface");

impl PgBind for VinterfaceRow {
    fn insert_columns() -> &'static [&'static str] {
        &["lcuuid", "domain", "mac", "network_id", "device_id", "region"]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.domain.clone());
        b.push_bind(self.mac.clone());
        b.push_bind(self.network_id);
        b.push_bind(self.device_id);
        b.push_bind(self.region.clone());
    }
}

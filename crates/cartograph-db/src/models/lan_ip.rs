//! LAN IP row model.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// A private IP address bound to a virtual interface.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct LanIpRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Owning domain.
    pub domain: String,
    /// The address.
    pub ip: String,
    /// Surrogate key of the owning interface. Immutable once set.
    pub vinterface_id: i32,
    /// Surrogate key of the interface's network. Immutable once set.
    pub network_id: i32,
}

super::impl_store_row!(LanIpRow, "lan_ip");

impl PgBind for LanIpRow {
    fn insert_columns() -> &'static [&'static str] {
        &["lcuuid", "domain", "ip", "vinterface_id", "network_id"]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.domain.clone());
        b.push_bind(self.ip.clone());
        b.push_bind(self.vinterface_id);
        b.push_bind(self.network_id);
    }
}

//! Floating IP row model.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// A floating IP bound to a compute instance through a network.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct FloatingIpRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Owning domain.
    pub domain: String,
    /// The address.
    pub ip: String,
    /// Surrogate key of the carrying network. Immutable once set.
    pub network_id: i32,
    /// Surrogate key of the owning VPC. Immutable once set.
    pub vpc_id: i32,
    /// Surrogate key of the bound compute instance. Immutable once set.
    pub vm_id: i32,
    /// Region logical ID.
    pub region: String,
}

super::impl_store_row!(FloatingIpRow, "floating_ip");

impl PgBind for FloatingIpRow {
    fn insert_columns() -> &'static [&'static str] {
        &["lcuuid", "domain", "ip", "network_id", "vpc_id", "vm_id", "region"]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.domain.clone());
        b.push_bind(self.ip.clone());
        b.push_bind(self.network_id);
        b.push_bind(self.vpc_id);
        b.push_bind(self.vm_id);
        b.push_bind(self.region.clone());
    }
}

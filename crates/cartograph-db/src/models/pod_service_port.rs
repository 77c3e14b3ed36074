//! Pod-service port row model.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// A port exposed by a pod service.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct PodServicePortRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Stable external identifier.
    pub lcuuid: String,
    /// Owning domain.
    pub domain: String,
    /// Port name.
    pub name: String,
    /// L4 protocol ("TCP", "UDP").
    pub protocol: String,
    /// Service port.
    pub port: i32,
    /// Node port, `0` when the service exposes none.
    pub node_port: i32,
    /// Surrogate key of the owning service. Immutable once set.
    pub pod_service_id: i32,
}

super::impl_store_row!(PodServicePortRow, "pod_service_port");

impl PgBind for PodServicePortRow {
    fn insert_columns() -> &'static [&'static str] {
        &[
            "lcuuid",
            "domain",
            "name",
            "protocol",
            "port",
            "node_port",
            "pod_service_id",
        ]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.domain.clone());
        b.push_bind(self.name.clone());
        b.push_bind(self.protocol.clone());
        b.push_bind(self.port);
        b.push_bind(self.node_port);
        b.push_bind(self.pod_service_id);
    }
}

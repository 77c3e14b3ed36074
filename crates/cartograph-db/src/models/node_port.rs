//! Node-port projection row model.
//!
//! Derived, not collected: recomputed after each reconciliation pass by
//! joining pod services, service ports and nodes. The `lcuuid` column
//! carries a derived composite key (`node/protocol/port`) so the
//! projection flows through the same store boundary as primary types.

use serde::{Deserialize, Serialize};
use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::FromRow;

use crate::row::PgBind;

/// "Which service owns this node port" lookup row.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct NodePortRow {
    /// Store-assigned surrogate key.
    #[serde(default)]
    pub id: i32,
    /// Derived composite key: `{pod_node_id}/{protocol}/{port}`.
    pub lcuuid: String,
    /// Surrogate key of the node exposing the port.
    pub pod_node_id: i32,
    /// L4 protocol.
    pub protocol: String,
    /// The node port.
    pub port: i32,
    /// Surrogate key of the owning service.
    pub pod_service_id: i32,
    /// Name of the owning service, denormalized for readers.
    pub pod_service_name: String,
}

impl NodePortRow {
    /// Builds the derived composite key.
    #[must_use]
    pub fn composite_key(pod_node_id: i32, protocol: &str, port: i32) -> String {
        format!("{pod_node_id}/{protocol}/{port}")
    }
}

super::impl_store_row!(NodePortRow, "node_port");

impl PgBind for NodePortRow {
    fn insert_columns() -> &'static [&'static str] {
        &[
            "lcuuid",
            "pod_node_id",
            "protocol",
            "port",
            "pod_service_id",
            "pod_service_name",
        ]
    }

    fn push_insert_values(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.lcuuid.clone());
        b.push_bind(self.pod_node_id);
        b.push_bind(self.protocol.clone());
        b.push_bind(self.port);
        b.push_bind(self.pod_service_id);
        b.push_bind(self.pod_service_name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_key_is_stable() {
        assert_eq!(NodePortRow::composite_key(7, "TCP", 30080), "7/TCP/30080");
    }
}

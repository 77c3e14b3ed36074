//! Persisted row models, one file per resource type.
//!
//! Every table is keyed by a store-assigned surrogate `id` with a unique
//! index on `lcuuid`, the stable external identifier. Soft-deletable
//! types carry a `deleted_at` tombstone.

/// Implements [`StoreRow`](crate::StoreRow) for a model with `id` and
/// `lcuuid` fields; the `soft_delete` form also wires the `deleted_at`
/// tombstone.
macro_rules! impl_store_row {
    ($row:ty, $table:literal) => {
        impl crate::row::StoreRow for $row {
            const TABLE: &'static str = $table;

            fn logical_id(&self) -> &str {
                &self.lcuuid
            }

            fn surrogate_key(&self) -> i32 {
                self.id
            }

            fn set_surrogate_key(&mut self, key: i32) {
                self.id = key;
            }
        }
    };
    ($row:ty, $table:literal, soft_delete) => {
        impl crate::row::StoreRow for $row {
            const TABLE: &'static str = $table;
            const SOFT_DELETE: bool = true;

            fn logical_id(&self) -> &str {
                &self.lcuuid
            }

            fn surrogate_key(&self) -> i32 {
                self.id
            }

            fn set_surrogate_key(&mut self, key: i32) {
                self.id = key;
            }

            fn deleted_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.deleted_at
            }

            fn set_deleted_at(&mut self, at: Option<chrono::DateTime<chrono::Utc>>) {
                self.deleted_at = at;
            }
        }
    };
}

pub(crate) use impl_store_row;

mod az;
mod floating_ip;
mod lan_ip;
mod network;
mod node_port;
mod pod;
mod pod_cluster;
mod pod_group;
mod pod_namespace;
mod pod_node;
mod pod_service;
mod pod_service_port;
mod region;
mod vinterface;
mod vm;
mod vm_pod_node_connection;
mod vpc;

pub use az::AzRow;
pub use floating_ip::FloatingIpRow;
pub use lan_ip::LanIpRow;
pub use network::NetworkRow;
pub use node_port::NodePortRow;
pub use pod::PodRow;
pub use pod_cluster::PodClusterRow;
pub use pod_group::PodGroupRow;
pub use pod_namespace::PodNamespaceRow;
pub use pod_node::PodNodeRow;
pub use pod_service::PodServiceRow;
pub use pod_service_port::PodServicePortRow;
pub use region::RegionRow;
pub use vinterface::VinterfaceRow;
pub use vm::VmRow;
pub use vm_pod_node_connection::VmPodNodeConnectionRow;
pub use vpc::VpcRow;

//! Cross-reference index.
//!
//! The tool data set maps logical IDs to store-assigned surrogate keys,
//! one map per resource type, so dependent types can resolve their
//! references without touching the store. Mutation entry points are called
//! only after a confirmed store write; read entry points are safe for
//! concurrent external readers.

use std::collections::HashMap;
use std::sync::RwLock;

use cartograph_core::{LogicalId, ResourceType};

macro_rules! id_map_accessors {
    ($field:ident, $add:ident, $get:ident, $del:ident) => {
        /// Records surrogate keys for newly inserted rows, one critical
        /// section for the whole batch.
        pub fn $add(&self, entries: Vec<(LogicalId, i32)>) {
            let mut map = self.$field.write().unwrap_or_else(|e| e.into_inner());
            for (id, key) in entries {
                map.insert(id, key);
            }
        }

        /// Resolves a logical ID to its surrogate key.
        pub fn $get(&self, lcuuid: &str) -> Option<i32> {
            let map = self.$field.read().unwrap_or_else(|e| e.into_inner());
            map.get(lcuuid).copied()
        }

        /// Drops mappings for deleted rows.
        pub fn $del(&self, ids: &[LogicalId]) {
            let mut map = self.$field.write().unwrap_or_else(|e| e.into_inner());
            for id in ids {
                map.remove(id);
            }
        }
    };
}

/// Per-type logical ID to surrogate key index, plus derived lookups.
#[derive(Debug, Default)]
pub struct ToolDataSet {
    region_ids: RwLock<HashMap<LogicalId, i32>>,
    az_ids: RwLock<HashMap<LogicalId, i32>>,
    vpc_ids: RwLock<HashMap<LogicalId, i32>>,
    network_ids: RwLock<HashMap<LogicalId, i32>>,
    vm_ids: RwLock<HashMap<LogicalId, i32>>,
    vinterface_ids: RwLock<HashMap<LogicalId, i32>>,
    lan_ip_ids: RwLock<HashMap<LogicalId, i32>>,
    floating_ip_ids: RwLock<HashMap<LogicalId, i32>>,
    pod_cluster_ids: RwLock<HashMap<LogicalId, i32>>,
    pod_node_ids: RwLock<HashMap<LogicalId, i32>>,
    vm_pod_node_connection_ids: RwLock<HashMap<LogicalId, i32>>,
    pod_namespace_ids: RwLock<HashMap<LogicalId, i32>>,
    pod_group_ids: RwLock<HashMap<LogicalId, i32>>,
    pod_ids: RwLock<HashMap<LogicalId, i32>>,
    pod_service_ids: RwLock<HashMap<LogicalId, i32>>,
    pod_service_port_ids: RwLock<HashMap<LogicalId, i32>>,
    /// Derived index: interface logical ID to the surrogate key of the
    /// network it attaches to. Lets IP types resolve their network without
    /// an extra snapshot reference.
    vinterface_networks: RwLock<HashMap<LogicalId, i32>>,
    names: RwLock<HashMap<(ResourceType, LogicalId), String>>,
}

impl ToolDataSet {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    id_map_accessors!(region_ids, add_regions, region_id_by_lcuuid, delete_regions);
    id_map_accessors!(az_ids, add_azs, az_id_by_lcuuid, delete_azs);
    id_map_accessors!(vpc_ids, add_vpcs, vpc_id_by_lcuuid, delete_vpcs);
    id_map_accessors!(network_ids, add_networks, network_id_by_lcuuid, delete_networks);
    id_map_accessors!(vm_ids, add_vms, vm_id_by_lcuuid, delete_vms);
    id_map_accessors!(
        vinterface_ids,
        add_vinterfaces,
        vinterface_id_by_lcuuid,
        delete_vinterfaces
    );
    id_map_accessors!(lan_ip_ids, add_lan_ips, lan_ip_id_by_lcuuid, delete_lan_ips);
    id_map_accessors!(
        floating_ip_ids,
        add_floating_ips,
        floating_ip_id_by_lcuuid,
        delete_floating_ips
    );
    id_map_accessors!(
        pod_cluster_ids,
        add_pod_clusters,
        pod_cluster_id_by_lcuuid,
        delete_pod_clusters
    );
    id_map_accessors!(pod_node_ids, add_pod_nodes, pod_node_id_by_lcuuid, delete_pod_nodes);
    id_map_accessors!(
        vm_pod_node_connection_ids,
        add_vm_pod_node_connections,
        vm_pod_node_connection_id_by_lcuuid,
        delete_vm_pod_node_connections
    );
    id_map_accessors!(
        pod_namespace_ids,
        add_pod_namespaces,
        pod_namespace_id_by_lcuuid,
        delete_pod_namespaces
    );
    id_map_accessors!(pod_group_ids, add_pod_groups, pod_group_id_by_lcuuid, delete_pod_groups);
    id_map_accessors!(pod_ids, add_pods, pod_id_by_lcuuid, delete_pods);
    id_map_accessors!(
        pod_service_ids,
        add_pod_services,
        pod_service_id_by_lcuuid,
        delete_pod_services
    );
    id_map_accessors!(
        pod_service_port_ids,
        add_pod_service_ports,
        pod_service_port_id_by_lcuuid,
        delete_pod_service_ports
    );
    id_map_accessors!(
        vinterface_networks,
        add_vinterface_networks,
        network_id_by_vinterface,
        delete_vinterface_networks
    );

    /// Records display names for external readers.
    pub fn set_names(&self, resource_type: ResourceType, entries: Vec<(LogicalId, String)>) {
        let mut map = self.names.write().unwrap_or_else(|e| e.into_inner());
        for (id, name) in entries {
            map.insert((resource_type, id), name);
        }
    }

    /// Looks up the display name recorded for a resource.
    pub fn name_by_lcuuid(&self, resource_type: ResourceType, lcuuid: &str) -> Option<String> {
        let map = self.names.read().unwrap_or_else(|e| e.into_inner());
        map.get(&(resource_type, LogicalId::new(lcuuid))).cloned()
    }

    /// Drops the names of deleted resources.
    pub fn delete_names(&self, resource_type: ResourceType, ids: &[LogicalId]) {
        let mut map = self.names.write().unwrap_or_else(|e| e.into_inner());
        for id in ids {
            map.remove(&(resource_type, id.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_map_roundtrip() {
        let tool = ToolDataSet::new();
        tool.add_vpcs(vec![(LogicalId::new("vpc-1"), 11)]);
        assert_eq!(tool.vpc_id_by_lcuuid("vpc-1"), Some(11));
        assert_eq!(tool.vpc_id_by_lcuuid("vpc-2"), None);

        tool.delete_vpcs(&[LogicalId::new("vpc-1")]);
        assert_eq!(tool.vpc_id_by_lcuuid("vpc-1"), None);
    }

    #[test]
    fn test_derived_vinterface_network_index() {
        let tool = ToolDataSet::new();
        tool.add_vinterface_networks(vec![(LogicalId::new("vif-1"), 3)]);
        assert_eq!(tool.network_id_by_vinterface("vif-1"), Some(3));
    }

    #[test]
    fn test_name_lookup_scoped_by_type() {
        let tool = ToolDataSet::new();
        tool.set_names(
            ResourceType::Vm,
            vec![(LogicalId::new("x"), "web".to_string())],
        );
        assert_eq!(tool.name_by_lcuuid(ResourceType::Vm, "x").as_deref(), Some("web"));
        assert_eq!(tool.name_by_lcuuid(ResourceType::Pod, "x"), None);

        tool.delete_names(ResourceType::Vm, &[LogicalId::new("x")]);
        assert_eq!(tool.name_by_lcuuid(ResourceType::Vm, "x"), None);
    }
}

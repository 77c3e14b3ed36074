//! Snapshot items delivered by collectors.
//!
//! A snapshot is a full replacement of one scope's state for one refresh
//! cycle, never an incremental diff. Items reference other resources by
//! logical ID only; surrogate keys never appear here. An item with an
//! empty `lcuuid` is malformed and skipped by the engine.

use serde::{Deserialize, Serialize};

use cartograph_core::LogicalId;

/// A cloud region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Region {
    pub lcuuid: LogicalId,
    pub name: String,
}

/// An availability zone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Az {
    pub lcuuid: LogicalId,
    pub name: String,
    pub label: String,
    pub region_lcuuid: LogicalId,
}

/// A VPC.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vpc {
    pub lcuuid: LogicalId,
    pub name: String,
    pub region_lcuuid: LogicalId,
}

/// A virtual network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Network {
    pub lcuuid: LogicalId,
    pub name: String,
    pub vpc_lcuuid: LogicalId,
    pub az_lcuuid: LogicalId,
    pub region_lcuuid: LogicalId,
}

/// A compute instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vm {
    pub lcuuid: LogicalId,
    pub name: String,
    pub label: String,
    pub state: i32,
    pub vpc_lcuuid: LogicalId,
    pub az_lcuuid: LogicalId,
    pub region_lcuuid: LogicalId,
}

/// A virtual interface attached to a compute instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vinterface {
    pub lcuuid: LogicalId,
    pub mac: String,
    pub network_lcuuid: LogicalId,
    pub vm_lcuuid: LogicalId,
    pub region_lcuuid: LogicalId,
}

/// A private IP bound to an interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanIp {
    pub lcuuid: LogicalId,
    pub ip: String,
    pub vinterface_lcuuid: LogicalId,
}

/// A floating IP bound to a compute instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloatingIp {
    pub lcuuid: LogicalId,
    pub ip: String,
    pub network_lcuuid: LogicalId,
    pub vpc_lcuuid: LogicalId,
    pub vm_lcuuid: LogicalId,
    pub region_lcuuid: LogicalId,
}

/// A container-orchestrator cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodCluster {
    pub lcuuid: LogicalId,
    pub name: String,
    pub az_lcuuid: LogicalId,
    pub region_lcuuid: LogicalId,
}

/// A worker node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodNode {
    pub lcuuid: LogicalId,
    pub name: String,
    pub state: i32,
    pub pod_cluster_lcuuid: LogicalId,
    pub az_lcuuid: LogicalId,
    pub region_lcuuid: LogicalId,
}

/// Join item linking a compute instance to the pod node it hosts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmPodNodeConnection {
    pub lcuuid: LogicalId,
    pub vm_lcuuid: LogicalId,
    pub pod_node_lcuuid: LogicalId,
}

/// A namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodNamespace {
    pub lcuuid: LogicalId,
    pub name: String,
    pub pod_cluster_lcuuid: LogicalId,
    pub az_lcuuid: LogicalId,
    pub region_lcuuid: LogicalId,
}

/// A workload controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodGroup {
    pub lcuuid: LogicalId,
    pub name: String,
    pub label: String,
    pub pod_num: i32,
    pub pod_namespace_lcuuid: LogicalId,
    pub pod_cluster_lcuuid: LogicalId,
    pub az_lcuuid: LogicalId,
    pub region_lcuuid: LogicalId,
}

/// A pod.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pod {
    pub lcuuid: LogicalId,
    pub name: String,
    pub state: i32,
    pub pod_group_lcuuid: LogicalId,
    pub pod_node_lcuuid: LogicalId,
    pub pod_namespace_lcuuid: LogicalId,
    pub pod_cluster_lcuuid: LogicalId,
    pub az_lcuuid: LogicalId,
    pub region_lcuuid: LogicalId,
}

/// A service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodService {
    pub lcuuid: LogicalId,
    pub name: String,
    pub service_cluster_ip: String,
    pub pod_namespace_lcuuid: LogicalId,
    pub pod_cluster_lcuuid: LogicalId,
    pub az_lcuuid: LogicalId,
    pub region_lcuuid: LogicalId,
}

/// A port exposed by a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodServicePort {
    pub lcuuid: LogicalId,
    pub name: String,
    pub protocol: String,
    pub port: i32,
    pub node_port: i32,
    pub pod_service_lcuuid: LogicalId,
}

/// One collector's full-replacement output for one refresh cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub regions: Vec<Region>,
    pub azs: Vec<Az>,
    pub vpcs: Vec<Vpc>,
    pub networks: Vec<Network>,
    pub vms: Vec<Vm>,
    pub vinterfaces: Vec<Vinterface>,
    pub lan_ips: Vec<LanIp>,
    pub floating_ips: Vec<FloatingIp>,
    pub pod_clusters: Vec<PodCluster>,
    pub pod_nodes: Vec<PodNode>,
    pub vm_pod_node_connections: Vec<VmPodNodeConnection>,
    pub pod_namespaces: Vec<PodNamespace>,
    pub pod_groups: Vec<PodGroup>,
    pub pods: Vec<Pod>,
    pub pod_services: Vec<PodService>,
    pub pod_service_ports: Vec<PodServicePort>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

//! Per-scope reconciliation cache.
//!
//! One `Cache` exists per recorded scope. It owns the diff-base maps, the
//! cross-reference tool data set and the generation sequence, and is the
//! only holder of diff bases. External readers share it through the tool
//! data set's read entry points.

mod diff_base;
mod diff_map;
mod tool_data_set;

pub use diff_base::{
    AzDiffBase, DiffBase, FloatingIpDiffBase, HasDiffBase, LanIpDiffBase, NetworkDiffBase,
    PodClusterDiffBase, PodDiffBase, PodGroupDiffBase, PodNamespaceDiffBase, PodNodeDiffBase,
    PodServiceDiffBase, PodServicePortDiffBase, RegionDiffBase, VinterfaceDiffBase,
    VmDiffBase, VmPodNodeConnectionDiffBase, VpcDiffBase,
};
pub use diff_map::DiffMap;
pub use tool_data_set::ToolDataSet;

use std::sync::atomic::{AtomicU64, Ordering};

use cartograph_core::Scope;

/// Diff bases, cross-reference index and generation sequence for one scope.
#[derive(Debug)]
pub struct Cache {
    scope: Scope,
    sequence: AtomicU64,
    /// Logical ID to surrogate key index.
    pub tool: ToolDataSet,
    pub regions: DiffMap<RegionDiffBase>,
    pub azs: DiffMap<AzDiffBase>,
    pub vpcs: DiffMap<VpcDiffBase>,
    pub networks: DiffMap<NetworkDiffBase>,
    pub vms: DiffMap<VmDiffBase>,
    pub vinterfaces: DiffMap<VinterfaceDiffBase>,
    pub lan_ips: DiffMap<LanIpDiffBase>,
    pub floating_ips: DiffMap<FloatingIpDiffBase>,
    pub pod_clusters: DiffMap<PodClusterDiffBase>,
    pub pod_nodes: DiffMap<PodNodeDiffBase>,
    pub vm_pod_node_connections: DiffMap<VmPodNodeConnectionDiffBase>,
    pub pod_namespaces: DiffMap<PodNamespaceDiffBase>,
    pub pod_groups: DiffMap<PodGroupDiffBase>,
    pub pods: DiffMap<PodDiffBase>,
    pub pod_services: DiffMap<PodServiceDiffBase>,
    pub pod_service_ports: DiffMap<PodServicePortDiffBase>,
}

impl Cache {
    /// Creates an empty cache for a scope. The sequence starts at zero and
    /// is bumped at the top of every pass.
    #[must_use]
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            sequence: AtomicU64::new(0),
            tool: ToolDataSet::new(),
            regions: DiffMap::new(),
            azs: DiffMap::new(),
            vpcs: DiffMap::new(),
            networks: DiffMap::new(),
            vms: DiffMap::new(),
            vinterfaces: DiffMap::new(),
            lan_ips: DiffMap::new(),
            floating_ips: DiffMap::new(),
            pod_clusters: DiffMap::new(),
            pod_nodes: DiffMap::new(),
            vm_pod_node_connections: DiffMap::new(),
            pod_namespaces: DiffMap::new(),
            pod_groups: DiffMap::new(),
            pods: DiffMap::new(),
            pod_services: DiffMap::new(),
            pod_service_ports: DiffMap::new(),
        }
    }

    /// The scope this cache records.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Generation sequence of the pass currently in flight (or the last
    /// completed one between passes).
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Advances the generation sequence. Called once at pass start.
    pub fn bump_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_increments_per_pass() {
        let scope = Scope::new("domain-1").unwrap();
        let cache = Cache::new(scope);
        assert_eq!(cache.sequence(), 0);
        assert_eq!(cache.bump_sequence(), 1);
        assert_eq!(cache.bump_sequence(), 2);
        assert_eq!(cache.sequence(), 2);
    }
}

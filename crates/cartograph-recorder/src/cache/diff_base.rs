//! Per-type diff-base items.
//!
//! A diff base is the cached image of one store row, reduced to the
//! logical ID, the generation sequence of the pass that last refreshed
//! it, and the mutable scalars compared on update. Surrogate keys live in
//! the tool data set, not here.

use cartograph_core::LogicalId;
use cartograph_db::models::{
    AzRow, FloatingIpRow, LanIpRow, NetworkRow, PodClusterRow, PodGroupRow, PodNamespaceRow,
    PodNodeRow, PodRow, PodServicePortRow, PodServiceRow, RegionRow, VinterfaceRow,
    VmPodNodeConnectionRow, VmRow, VpcRow,
};

use crate::snapshot;

/// Fields shared by every diff base.
#[derive(Debug, Clone, Default)]
pub struct DiffBase {
    /// Generation sequence of the pass that last refreshed this entry.
    pub sequence: u64,
    /// Stable external identifier of the mirrored row.
    pub logical_id: LogicalId,
}

impl DiffBase {
    fn new(lcuuid: &str, sequence: u64) -> Self {
        Self {
            sequence,
            logical_id: LogicalId::new(lcuuid),
        }
    }
}

/// Access to the shared diff-base fields, used for sequence stamping.
pub trait HasDiffBase {
    fn base(&self) -> &DiffBase;
    fn base_mut(&mut self) -> &mut DiffBase;
}

macro_rules! impl_has_diff_base {
    ($ty:ty) => {
        impl HasDiffBase for $ty {
            fn base(&self) -> &DiffBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut DiffBase {
                &mut self.base
            }
        }
    };
}

#[derive(Debug, Clone, Default)]
pub struct RegionDiffBase {
    pub base: DiffBase,
    pub name: String,
}

impl RegionDiffBase {
    pub fn from_row(row: &RegionRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::Region) {
        self.name = item.name.clone();
    }
}
impl_has_diff_base!(RegionDiffBase);

#[derive(Debug, Clone, Default)]
pub struct AzDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub label: String,
    pub region: String,
}

impl AzDiffBase {
    pub fn from_row(row: &AzRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            label: row.label.clone(),
            region: row.region.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::Az) {
        self.name = item.name.clone();
        self.label = item.label.clone();
        self.region = item.region_lcuuid.as_str().to_string();
    }
}
impl_has_diff_base!(AzDiffBase);

#[derive(Debug, Clone, Default)]
pub struct VpcDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub region: String,
}

impl VpcDiffBase {
    pub fn from_row(row: &VpcRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            region: row.region.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::Vpc) {
        self.name = item.name.clone();
        self.region = item.region_lcuuid.as_str().to_string();
    }
}
impl_has_diff_base!(VpcDiffBase);

#[derive(Debug, Clone, Default)]
pub struct NetworkDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub az: String,
    pub region: String,
}

impl NetworkDiffBase {
    pub fn from_row(row: &NetworkRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            az: row.az.clone(),
            region: row.region.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::Network) {
        self.name = item.name.clone();
        self.az = item.az_lcuuid.as_str().to_string();
        self.region = item.region_lcuuid.as_str().to_string();
    }
}
impl_has_diff_base!(NetworkDiffBase);

#[derive(Debug, Clone, Default)]
pub struct VmDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub label: String,
    pub state: i32,
    pub az: String,
    pub region: String,
}

impl VmDiffBase {
    pub fn from_row(row: &VmRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            label: row.label.clone(),
            state: row.state,
            az: row.az.clone(),
            region: row.region.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::Vm) {
        self.name = item.name.clone();
        self.label = item.label.clone();
        self.state = item.state;
        self.az = item.az_lcuuid.as_str().to_string();
        self.region = item.region_lcuuid.as_str().to_string();
    }
}
impl_has_diff_base!(VmDiffBase);

#[derive(Debug, Clone, Default)]
pub struct VinterfaceDiffBase {
    pub base: DiffBase,
    pub mac: String,
    pub region: String,
}

impl VinterfaceDiffBase {
    pub fn from_row(row: &VinterfaceRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            mac: row.mac.clone(),
            region: row.region.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::Vinterface) {
        self.mac = item.mac.clone();
        self.region = item.region_lcuuid.as_str().to_string();
    }
}
impl_has_diff_base!(VinterfaceDiffBase);

#[derive(Debug, Clone, Default)]
pub struct LanIpDiffBase {
    pub base: DiffBase,
    pub ip: String,
}

impl LanIpDiffBase {
    pub fn from_row(row: &LanIpRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            ip: row.ip.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::LanIp) {
        self.ip = item.ip.clone();
    }
}
impl_has_diff_base!(LanIpDiffBase);

#[derive(Debug, Clone, Default)]
pub struct FloatingIpDiffBase {
    pub base: DiffBase,
    pub region: String,
}

impl FloatingIpDiffBase {
    pub fn from_row(row: &FloatingIpRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            region: row.region.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::FloatingIp) {
        self.region = item.region_lcuuid.as_str().to_string();
    }
}
impl_has_diff_base!(FloatingIpDiffBase);

#[derive(Debug, Clone, Default)]
pub struct PodClusterDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub az: String,
    pub region: String,
}

impl PodClusterDiffBase {
    pub fn from_row(row: &PodClusterRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            az: row.az.clone(),
            region: row.region.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::PodCluster) {
        self.name = item.name.clone();
        self.az = item.az_lcuuid.as_str().to_string();
        self.region = item.region_lcuuid.as_str().to_string();
    }
}
impl_has_diff_base!(PodClusterDiffBase);

#[derive(Debug, Clone, Default)]
pub struct PodNodeDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub state: i32,
    pub az: String,
    pub region: String,
}

impl PodNodeDiffBase {
    pub fn from_row(row: &PodNodeRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            state: row.state,
            az: row.az.clone(),
            region: row.region.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::PodNode) {
        self.name = item.name.clone();
        self.state = item.state;
        self.az = item.az_lcuuid.as_str().to_string();
        self.region = item.region_lcuuid.as_str().to_string();
    }
}
impl_has_diff_base!(PodNodeDiffBase);

/// Join rows carry no mutable scalars; the diff base exists only for
/// add/delete detection.
#[derive(Debug, Clone, Default)]
pub struct VmPodNodeConnectionDiffBase {
    pub base: DiffBase,
}

impl VmPodNodeConnectionDiffBase {
    pub fn from_row(row: &VmPodNodeConnectionRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
        }
    }
}
impl_has_diff_base!(VmPodNodeConnectionDiffBase);

#[derive(Debug, Clone, Default)]
pub struct PodNamespaceDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub az: String,
    pub region: String,
}

impl PodNamespaceDiffBase {
    pub fn from_row(row: &PodNamespaceRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            az: row.az.clone(),
            region: row.region.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::PodNamespace) {
        self.name = item.name.clone();
        self.az = item.az_lcuuid.as_str().to_string();
        self.region = item.region_lcuuid.as_str().to_string();
    }
}
impl_has_diff_base!(PodNamespaceDiffBase);

#[derive(Debug, Clone, Default)]
pub struct PodGroupDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub label: String,
    pub pod_num: i32,
}

impl PodGroupDiffBase {
    pub fn from_row(row: &PodGroupRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            label: row.label.clone(),
            pod_num: row.pod_num,
        }
    }

    pub fn update(&mut self, item: &snapshot::PodGroup) {
        self.name = item.name.clone();
        self.label = item.label.clone();
        self.pod_num = item.pod_num;
    }
}
impl_has_diff_base!(PodGroupDiffBase);

#[derive(Debug, Clone, Default)]
pub struct PodDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub state: i32,
}

impl PodDiffBase {
    pub fn from_row(row: &PodRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            state: row.state,
        }
    }

    pub fn update(&mut self, item: &snapshot::Pod) {
        self.name = item.name.clone();
        self.state = item.state;
    }
}
impl_has_diff_base!(PodDiffBase);

#[derive(Debug, Clone, Default)]
pub struct PodServiceDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub service_cluster_ip: String,
}

impl PodServiceDiffBase {
    pub fn from_row(row: &PodServiceRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            service_cluster_ip: row.service_cluster_ip.clone(),
        }
    }

    pub fn update(&mut self, item: &snapshot::PodService) {
        self.name = item.name.clone();
        self.service_cluster_ip = item.service_cluster_ip.clone();
    }
}
impl_has_diff_base!(PodServiceDiffBase);

#[derive(Debug, Clone, Default)]
pub struct PodServicePortDiffBase {
    pub base: DiffBase,
    pub name: String,
    pub protocol: String,
    pub port: i32,
    pub node_port: i32,
}

impl PodServicePortDiffBase {
    pub fn from_row(row: &PodServicePortRow, sequence: u64) -> Self {
        Self {
            base: DiffBase::new(&row.lcuuid, sequence),
            name: row.name.clone(),
            protocol: row.protocol.clone(),
            port: row.port,
            node_port: row.node_port,
        }
    }

    pub fn update(&mut self, item: &snapshot::PodServicePort) {
        self.name = item.name.clone();
        self.protocol = item.protocol.clone();
        self.port = item.port;
        self.node_port = item.node_port;
    }
}
impl_has_diff_base!(PodServicePortDiffBase);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row_stamps_sequence() {
        let row = VmRow {
            lcuuid: "vm-1".to_string(),
            name: "web".to_string(),
            state: 4,
            ..VmRow::default()
        };
        let diff = VmDiffBase::from_row(&row, 9);
        assert_eq!(diff.base.sequence, 9);
        assert_eq!(diff.base.logical_id.as_str(), "vm-1");
        assert_eq!(diff.state, 4);
    }

    #[test]
    fn test_update_replaces_mutable_scalars() {
        let mut diff = PodGroupDiffBase {
            name: "old".to_string(),
            pod_num: 1,
            ..PodGroupDiffBase::default()
        };
        let item = snapshot::PodGroup {
            name: "new".to_string(),
            pod_num: 3,
            ..snapshot::PodGroup::default()
        };
        diff.update(&item);
        assert_eq!(diff.name, "new");
        assert_eq!(diff.pod_num, 3);
    }
}

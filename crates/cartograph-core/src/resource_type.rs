//! Recorded Resource Types
//!
//! The closed set of resource types the recorder reconciles. Display names
//! are the snake_case table names and appear in logs and diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A resource type known to the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Region,
    Az,
    Vpc,
    Network,
    Vm,
    Vinterface,
    LanIp,
    FloatingIp,
    PodCluster,
    PodNode,
    VmPodNodeConnection,
    PodNamespace,
    PodGroup,
    Pod,
    PodService,
    PodServicePort,
    /// Denormalized node-port projection, derived rather than collected.
    NodePort,
}

impl ResourceType {
    /// All primary (collected) resource types. Projections are excluded.
    pub const PRIMARY: [ResourceType; 16] = [
        ResourceType::Region,
        ResourceType::Az,
        ResourceType::Vpc,
        ResourceType::Network,
        ResourceType::Vm,
        ResourceType::Vinterface,
        ResourceType::LanIp,
        ResourceType::FloatingIp,
        ResourceType::PodCluster,
        ResourceType::PodNode,
        ResourceType::VmPodNodeConnection,
        ResourceType::PodNamespace,
        ResourceType::PodGroup,
        ResourceType::Pod,
        ResourceType::PodService,
        ResourceType::PodServicePort,
    ];

    /// The table / log name of this resource type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Region => "region",
            ResourceType::Az => "az",
            ResourceType::Vpc => "vpc",
            ResourceType::Network => "network",
            ResourceType::Vm => "vm",
            ResourceType::Vinterface => "vinterface",
            ResourceType::LanIp => "lan_ip",
            ResourceType::FloatingIp => "floating_ip",
            ResourceType::PodCluster => "pod_cluster",
            ResourceType::PodNode => "pod_node",
            ResourceType::VmPodNodeConnection => "vm_pod_node_connection",
            ResourceType::PodNamespace => "pod_namespace",
            ResourceType::PodGroup => "pod_group",
            ResourceType::Pod => "pod",
            ResourceType::PodService => "pod_service",
            ResourceType::PodServicePort => "pod_service_port",
            ResourceType::NodePort => "node_port",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_snake_case() {
        assert_eq!(ResourceType::LanIp.to_string(), "lan_ip");
        assert_eq!(
            ResourceType::VmPodNodeConnection.to_string(),
            "vm_pod_node_connection"
        );
    }

    #[test]
    fn test_primary_excludes_projections() {
        assert!(!ResourceType::PRIMARY.contains(&ResourceType::NodePort));
        assert_eq!(ResourceType::PRIMARY.len(), 16);
    }
}

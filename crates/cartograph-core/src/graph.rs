//! Resource Dependency Graph
//!
//! The reference graph between resource types as explicit, declared data.
//! A reconciliation pass must process a type only after every type it
//! references, so the pass driver consumes the topological order computed
//! here instead of relying on call-site ordering.

use std::collections::{HashMap, HashSet};

use crate::error::{CoreError, Result};
use crate::resource_type::ResourceType;

/// A directed acyclic graph of resource-type dependencies.
///
/// An edge `dependent -> dependency` states that `dependent` resolves
/// references into `dependency` and therefore must reconcile after it.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<ResourceType>,
    /// dependent -> set of dependencies.
    edges: HashMap<ResourceType, HashSet<ResourceType>>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with no dependencies. Idempotent.
    pub fn add_node(&mut self, node: ResourceType) -> &mut Self {
        if !self.nodes.contains(&node) {
            self.nodes.push(node);
        }
        self
    }

    /// Declares that `dependent` references `dependency`.
    ///
    /// Both endpoints are added as nodes if not yet present.
    pub fn depends_on(&mut self, dependent: ResourceType, dependency: ResourceType) -> &mut Self {
        self.add_node(dependency);
        self.add_node(dependent);
        self.edges.entry(dependent).or_default().insert(dependency);
        self
    }

    /// The direct dependencies of a node.
    #[must_use]
    pub fn dependencies_of(&self, node: ResourceType) -> Vec<ResourceType> {
        let mut deps: Vec<ResourceType> = self
            .edges
            .get(&node)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        deps.sort();
        deps
    }

    /// Computes a topological order: every node appears after all of its
    /// dependencies. Insertion order breaks ties so the result is stable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DependencyCycle`] if the declared edges contain
    /// a cycle.
    pub fn topo_order(&self) -> Result<Vec<ResourceType>> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut placed: HashSet<ResourceType> = HashSet::new();
        let mut remaining: Vec<ResourceType> = self.nodes.clone();

        while !remaining.is_empty() {
            let before = order.len();
            remaining.retain(|&node| {
                let ready = self
                    .edges
                    .get(&node)
                    .is_none_or(|deps| deps.iter().all(|d| placed.contains(d)));
                if ready {
                    order.push(node);
                    placed.insert(node);
                }
                !ready
            });
            if order.len() == before {
                let mut stuck: Vec<String> =
                    remaining.iter().map(|r| r.as_str().to_string()).collect();
                stuck.sort();
                return Err(CoreError::DependencyCycle {
                    nodes: stuck.join(", "),
                });
            }
        }
        Ok(order)
    }
}

/// The dependency graph of all primary resource types recorded today.
#[must_use]
pub fn recorder_graph() -> DependencyGraph {
    use ResourceType::*;

    let mut g = DependencyGraph::new();
    for rt in ResourceType::PRIMARY {
        g.add_node(rt);
    }
    g.depends_on(Az, Region)
        .depends_on(Network, Vpc)
        .depends_on(Vm, Vpc)
        .depends_on(Vinterface, Network)
        .depends_on(Vinterface, Vm)
        .depends_on(LanIp, Vinterface)
        .depends_on(FloatingIp, Network)
        .depends_on(FloatingIp, Vpc)
        .depends_on(FloatingIp, Vm)
        .depends_on(PodNode, PodCluster)
        .depends_on(VmPodNodeConnection, Vm)
        .depends_on(VmPodNodeConnection, PodNode)
        .depends_on(PodNamespace, PodCluster)
        .depends_on(PodGroup, PodNamespace)
        .depends_on(PodGroup, PodCluster)
        .depends_on(Pod, PodGroup)
        .depends_on(Pod, PodNode)
        .depends_on(Pod, PodNamespace)
        .depends_on(Pod, PodCluster)
        .depends_on(PodService, PodNamespace)
        .depends_on(PodService, PodCluster)
        .depends_on(PodServicePort, PodService);
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use ResourceType::*;

    fn position(order: &[ResourceType], rt: ResourceType) -> usize {
        order.iter().position(|&r| r == rt).unwrap()
    }

    #[test]
    fn test_recorder_graph_orders_dependencies_first() {
        let order = recorder_graph().topo_order().unwrap();
        assert_eq!(order.len(), ResourceType::PRIMARY.len());

        assert!(position(&order, Region) < position(&order, Az));
        assert!(position(&order, Vpc) < position(&order, Network));
        assert!(position(&order, Network) < position(&order, Vinterface));
        assert!(position(&order, Vm) < position(&order, Vinterface));
        assert!(position(&order, Vinterface) < position(&order, LanIp));
        assert!(position(&order, Vm) < position(&order, FloatingIp));
        assert!(position(&order, PodCluster) < position(&order, PodNode));
        assert!(position(&order, PodNode) < position(&order, VmPodNodeConnection));
        assert!(position(&order, PodNamespace) < position(&order, PodGroup));
        assert!(position(&order, PodGroup) < position(&order, Pod));
        assert!(position(&order, PodService) < position(&order, PodServicePort));
    }

    #[test]
    fn test_topo_order_is_stable() {
        let g = recorder_graph();
        assert_eq!(g.topo_order().unwrap(), g.topo_order().unwrap());
    }

    #[test]
    fn test_cycle_is_detected() {
        let mut g = DependencyGraph::new();
        g.depends_on(Az, Region);
        g.depends_on(Region, Vpc);
        g.depends_on(Vpc, Az);
        let err = g.topo_order().unwrap_err();
        assert!(matches!(err, CoreError::DependencyCycle { .. }));
        assert!(err.to_string().contains("az"));
    }

    #[test]
    fn test_isolated_node_is_ordered() {
        let mut g = DependencyGraph::new();
        g.add_node(Region);
        assert_eq!(g.topo_order().unwrap(), vec![Region]);
        assert!(g.dependencies_of(Region).is_empty());
    }
}

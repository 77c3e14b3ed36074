//! Denormalized projection builder.
//!
//! Projections are derived tables computed by joining already-reconciled
//! primary tables, then applied with the same add/update/delete diff the
//! primary engine uses. They never feed back into the primary tables.
//!
//! Projection rows are keyed by a composite logical ID built from the
//! joined keys, so the generic store boundary applies unchanged.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use cartograph_core::ResourceType;
use cartograph_db::models::{NodePortRow, PodNodeRow, PodServicePortRow, PodServiceRow};
use cartograph_db::{FieldChanges, ResourceStore, StoreRow};

use crate::error::RecorderResult;
use crate::operator::Operator;
use crate::updater::TypeCounts;

/// A derived table: how to compute the wanted rows and how to diff a
/// wanted row against an existing one.
#[async_trait]
pub trait ProjectionStrategy: Send + Sync {
    type Row: StoreRow;

    fn resource_type(&self) -> ResourceType;

    /// Computes the full wanted state, keyed by the composite logical ID.
    async fn generate(&self) -> RecorderResult<HashMap<String, Self::Row>>;

    /// Compares an existing projection row against the wanted one.
    fn update_diff(&self, existing: &Self::Row, wanted: &Self::Row) -> FieldChanges;
}

/// Applies a projection strategy against its target table with the usual
/// store-first discipline.
pub struct ProjectionUpdater<S: ProjectionStrategy> {
    strategy: S,
    operator: Operator<S::Row>,
}

impl<S: ProjectionStrategy> ProjectionUpdater<S> {
    pub fn new(strategy: S, operator: Operator<S::Row>) -> Self {
        Self { strategy, operator }
    }

    /// Recomputes the wanted state and reconciles the projection table
    /// toward it.
    pub async fn refresh(&self) -> RecorderResult<TypeCounts> {
        let wanted = self.strategy.generate().await?;
        let existing: HashMap<String, S::Row> = self
            .operator
            .fetch_all()
            .await?
            .into_iter()
            .map(|r| (r.logical_id().to_string(), r))
            .collect();

        let mut counts = TypeCounts::default();
        let mut to_add = Vec::new();
        for (key, row) in &wanted {
            match existing.get(key) {
                None => to_add.push(row.clone()),
                Some(old) => {
                    let changes = self.strategy.update_diff(old, row);
                    if !changes.is_empty() && self.operator.update(key, &changes).await? {
                        counts.updated += 1;
                    }
                }
            }
        }
        if !to_add.is_empty() {
            counts.added = self.operator.add_batch(to_add).await?.len();
        }

        let stale: Vec<String> = existing
            .keys()
            .filter(|k| !wanted.contains_key(*k))
            .cloned()
            .collect();
        if !stale.is_empty() && self.operator.delete_batch(&stale).await? {
            counts.deleted = stale.len();
        }

        if !counts.is_noop() {
            info!(
                resource_type = self.strategy.resource_type().as_str(),
                added = counts.added,
                updated = counts.updated,
                deleted = counts.deleted,
                "projection refreshed"
            );
        }
        Ok(counts)
    }
}

/// Node-port projection: one row per exposed node port per cluster node,
/// carrying the owning service's surrogate key and name.
pub struct NodePortProjection {
    services: Arc<dyn ResourceStore<PodServiceRow>>,
    ports: Arc<dyn ResourceStore<PodServicePortRow>>,
    nodes: Arc<dyn ResourceStore<PodNodeRow>>,
}

impl NodePortProjection {
    pub fn new(
        services: Arc<dyn ResourceStore<PodServiceRow>>,
        ports: Arc<dyn ResourceStore<PodServicePortRow>>,
        nodes: Arc<dyn ResourceStore<PodNodeRow>>,
    ) -> Self {
        Self {
            services,
            ports,
            nodes,
        }
    }
}

#[async_trait]
impl ProjectionStrategy for NodePortProjection {
    type Row = NodePortRow;

    fn resource_type(&self) -> ResourceType {
        ResourceType::NodePort
    }

    async fn generate(&self) -> RecorderResult<HashMap<String, NodePortRow>> {
        let services = self.services.fetch_all().await?;
        let ports = self.ports.fetch_all().await?;
        let nodes = self.nodes.fetch_all().await?;

        let service_by_id: HashMap<i32, &PodServiceRow> =
            services.iter().map(|s| (s.id, s)).collect();

        let mut wanted = HashMap::new();
        for port in &ports {
            // Only node-exposed ports project; cluster-internal ports do not.
            if port.node_port <= 0 {
                continue;
            }
            let Some(service) = service_by_id.get(&port.pod_service_id) else {
                continue;
            };
            for node in nodes.iter().filter(|n| n.pod_cluster_id == service.pod_cluster_id) {
                let key = NodePortRow::composite_key(node.id, &port.protocol, port.node_port);
                wanted.insert(
                    key.clone(),
                    NodePortRow {
                        id: 0,
                        lcuuid: key,
                        pod_node_id: node.id,
                        protocol: port.protocol.clone(),
                        port: port.node_port,
                        pod_service_id: service.id,
                        pod_service_name: service.name.clone(),
                    },
                );
            }
        }
        Ok(wanted)
    }

    fn update_diff(&self, existing: &NodePortRow, wanted: &NodePortRow) -> FieldChanges {
        let mut changes = FieldChanges::new();
        if existing.pod_service_id != wanted.pod_service_id {
            changes.set("pod_service_id", wanted.pod_service_id);
        }
        if existing.pod_service_name != wanted.pod_service_name {
            changes.set("pod_service_name", wanted.pod_service_name.clone());
        }
        changes
    }
}

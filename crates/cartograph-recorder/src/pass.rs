//! Pass driver.
//!
//! A `Recorder` owns everything one scope needs: its store handles, its
//! cache and its configuration. One pass reconciles a full snapshot:
//! add/update phases run for every type in dependency order, delete phases
//! run in reverse dependency order so dependents go before their
//! dependencies, and the projections are rebuilt last.

use std::collections::BTreeMap;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{error, info, instrument};

use cartograph_core::{recorder_graph, ResourceType, Scope};
use cartograph_db::models::{
    AzRow, FloatingIpRow, LanIpRow, NetworkRow, NodePortRow, PodClusterRow, PodGroupRow,
    PodNamespaceRow, PodNodeRow, PodRow, PodServicePortRow, PodServiceRow, RegionRow,
    VinterfaceRow, VmPodNodeConnectionRow, VmRow, VpcRow,
};
use cartograph_db::{MemoryStore, PgStore, ResourceStore, StoreRow};

use crate::cache::Cache;
use crate::config::RecorderConfig;
use crate::error::RecorderResult;
use crate::operator::Operator;
use crate::projection::{NodePortProjection, ProjectionUpdater};
use crate::snapshot::Snapshot;
use crate::updater::{
    AzStrategy, FloatingIpStrategy, LanIpStrategy, NetworkStrategy, PodClusterStrategy,
    PodGroupStrategy, PodNamespaceStrategy, PodNodeStrategy, PodServicePortStrategy,
    PodServiceStrategy, PodStrategy, RegionStrategy, TypeCounts, Updater, UpdaterStrategy,
    VinterfaceStrategy, VmPodNodeConnectionStrategy, VmStrategy, VpcStrategy,
};

/// One store handle per table. The handles are trait objects so the same
/// recorder runs against Postgres or the in-memory store unchanged.
pub struct Stores {
    pub regions: Arc<dyn ResourceStore<RegionRow>>,
    pub azs: Arc<dyn ResourceStore<AzRow>>,
    pub vpcs: Arc<dyn ResourceStore<VpcRow>>,
    pub networks: Arc<dyn ResourceStore<NetworkRow>>,
    pub vms: Arc<dyn ResourceStore<VmRow>>,
    pub vinterfaces: Arc<dyn ResourceStore<VinterfaceRow>>,
    pub lan_ips: Arc<dyn ResourceStore<LanIpRow>>,
    pub floating_ips: Arc<dyn ResourceStore<FloatingIpRow>>,
    pub pod_clusters: Arc<dyn ResourceStore<PodClusterRow>>,
    pub pod_nodes: Arc<dyn ResourceStore<PodNodeRow>>,
    pub vm_pod_node_connections: Arc<dyn ResourceStore<VmPodNodeConnectionRow>>,
    pub pod_namespaces: Arc<dyn ResourceStore<PodNamespaceRow>>,
    pub pod_groups: Arc<dyn ResourceStore<PodGroupRow>>,
    pub pods: Arc<dyn ResourceStore<PodRow>>,
    pub pod_services: Arc<dyn ResourceStore<PodServiceRow>>,
    pub pod_service_ports: Arc<dyn ResourceStore<PodServicePortRow>>,
    pub node_ports: Arc<dyn ResourceStore<NodePortRow>>,
}

impl Stores {
    /// Postgres-backed handles sharing one pool.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            regions: Arc::new(PgStore::new(pool.clone())),
            azs: Arc::new(PgStore::new(pool.clone())),
            vpcs: Arc::new(PgStore::new(pool.clone())),
            networks: Arc::new(PgStore::new(pool.clone())),
            vms: Arc::new(PgStore::new(pool.clone())),
            vinterfaces: Arc::new(PgStore::new(pool.clone())),
            lan_ips: Arc::new(PgStore::new(pool.clone())),
            floating_ips: Arc::new(PgStore::new(pool.clone())),
            pod_clusters: Arc::new(PgStore::new(pool.clone())),
            pod_nodes: Arc::new(PgStore::new(pool.clone())),
            vm_pod_node_connections: Arc::new(PgStore::new(pool.clone())),
            pod_namespaces: Arc::new(PgStore::new(pool.clone())),
            pod_groups: Arc::new(PgStore::new(pool.clone())),
            pods: Arc::new(PgStore::new(pool.clone())),
            pod_services: Arc::new(PgStore::new(pool.clone())),
            pod_service_ports: Arc::new(PgStore::new(pool.clone())),
            node_ports: Arc::new(PgStore::new(pool.clone())),
        }
    }

    /// In-memory handles, one isolated store per table. Used by the test
    /// suite and for local development.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            regions: Arc::new(MemoryStore::<RegionRow>::new()),
            azs: Arc::new(MemoryStore::<AzRow>::new()),
            vpcs: Arc::new(MemoryStore::<VpcRow>::new()),
            networks: Arc::new(MemoryStore::<NetworkRow>::new()),
            vms: Arc::new(MemoryStore::<VmRow>::new()),
            vinterfaces: Arc::new(MemoryStore::<VinterfaceRow>::new()),
            lan_ips: Arc::new(MemoryStore::<LanIpRow>::new()),
            floating_ips: Arc::new(MemoryStore::<FloatingIpRow>::new()),
            pod_clusters: Arc::new(MemoryStore::<PodClusterRow>::new()),
            pod_nodes: Arc::new(MemoryStore::<PodNodeRow>::new()),
            vm_pod_node_connections: Arc::new(MemoryStore::<VmPodNodeConnectionRow>::new()),
            pod_namespaces: Arc::new(MemoryStore::<PodNamespaceRow>::new()),
            pod_groups: Arc::new(MemoryStore::<PodGroupRow>::new()),
            pods: Arc::new(MemoryStore::<PodRow>::new()),
            pod_services: Arc::new(MemoryStore::<PodServiceRow>::new()),
            pod_service_ports: Arc::new(MemoryStore::<PodServicePortRow>::new()),
            node_ports: Arc::new(MemoryStore::<NodePortRow>::new()),
        }
    }
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct PassSummary {
    /// Generation sequence of this pass.
    pub sequence: u64,
    /// Per-type counters, only for types the pass touched.
    pub counts: BTreeMap<ResourceType, TypeCounts>,
}

impl PassSummary {
    fn merge(&mut self, resource_type: ResourceType, counts: TypeCounts) {
        if !counts.is_noop() {
            self.counts.entry(resource_type).or_default().absorb(counts);
        }
    }

    /// Counters summed over every type.
    #[must_use]
    pub fn totals(&self) -> TypeCounts {
        let mut totals = TypeCounts::default();
        for counts in self.counts.values() {
            totals.absorb(*counts);
        }
        totals
    }
}

/// The reconciliation engine for one scope.
pub struct Recorder {
    cache: Arc<Cache>,
    stores: Stores,
    config: RecorderConfig,
    order: Vec<ResourceType>,
}

impl Recorder {
    /// Creates a recorder for a scope with an empty cache.
    ///
    /// # Errors
    ///
    /// Fails if the declared dependency graph does not sort, which means a
    /// programming error in the graph declaration.
    pub fn new(scope: Scope, stores: Stores, config: RecorderConfig) -> RecorderResult<Self> {
        let order = recorder_graph().topo_order()?;
        Ok(Self {
            cache: Arc::new(Cache::new(scope)),
            stores,
            config,
            order,
        })
    }

    /// Shared handle to the cache, for external readers.
    #[must_use]
    pub fn cache(&self) -> Arc<Cache> {
        Arc::clone(&self.cache)
    }

    /// Warm start: rebuilds the diff bases and tool data set from the live
    /// store rows, in dependency order. Call once before the first pass
    /// when the store may already hold state.
    pub async fn load_from_store(&self) -> RecorderResult<()> {
        for rt in &self.order {
            match rt {
                ResourceType::Region => self.warm(&self.region_updater()).await?,
                ResourceType::Az => self.warm(&self.az_updater()).await?,
                ResourceType::Vpc => self.warm(&self.vpc_updater()).await?,
                ResourceType::Network => self.warm(&self.network_updater()).await?,
                ResourceType::Vm => self.warm(&self.vm_updater()).await?,
                ResourceType::Vinterface => self.warm(&self.vinterface_updater()).await?,
                ResourceType::LanIp => self.warm(&self.lan_ip_updater()).await?,
                ResourceType::FloatingIp => self.warm(&self.floating_ip_updater()).await?,
                ResourceType::PodCluster => self.warm(&self.pod_cluster_updater()).await?,
                ResourceType::PodNode => self.warm(&self.pod_node_updater()).await?,
                ResourceType::VmPodNodeConnection => {
                    self.warm(&self.vm_pod_node_connection_updater()).await?;
                }
                ResourceType::PodNamespace => self.warm(&self.pod_namespace_updater()).await?,
                ResourceType::PodGroup => self.warm(&self.pod_group_updater()).await?,
                ResourceType::Pod => self.warm(&self.pod_updater()).await?,
                ResourceType::PodService => self.warm(&self.pod_service_updater()).await?,
                ResourceType::PodServicePort => {
                    self.warm(&self.pod_service_port_updater()).await?;
                }
                ResourceType::NodePort => {}
            }
        }
        info!(scope = %self.cache.scope(), "cache loaded from store");
        Ok(())
    }

    /// Reconciles one full snapshot. Store-unreachable aborts the pass and
    /// leaves the cache consistent with what the store confirmed so far;
    /// the next pass picks up the remainder.
    #[instrument(skip_all, fields(scope = %self.cache.scope(), sequence = tracing::field::Empty))]
    pub async fn run_pass(&self, snapshot: &Snapshot) -> RecorderResult<PassSummary> {
        let sequence = self.cache.bump_sequence();
        tracing::Span::current().record("sequence", sequence);
        let mut summary = PassSummary {
            sequence,
            ..PassSummary::default()
        };

        for rt in &self.order {
            let counts = match self.add_and_update_for(*rt, snapshot).await {
                Ok(counts) => counts,
                Err(e) => {
                    error!(resource_type = rt.as_str(), error = %e, "pass aborted");
                    return Err(e);
                }
            };
            summary.merge(*rt, counts);
        }

        // Dependents go before their dependencies.
        for rt in self.order.iter().rev() {
            let deleted = match self.delete_for(*rt, snapshot).await {
                Ok(deleted) => deleted,
                Err(e) => {
                    error!(resource_type = rt.as_str(), error = %e, "pass aborted");
                    return Err(e);
                }
            };
            summary.merge(
                *rt,
                TypeCounts {
                    deleted,
                    ..TypeCounts::default()
                },
            );
        }

        if self.config.projections_enabled {
            let projection = ProjectionUpdater::new(
                NodePortProjection::new(
                    Arc::clone(&self.stores.pod_services),
                    Arc::clone(&self.stores.pod_service_ports),
                    Arc::clone(&self.stores.pod_nodes),
                ),
                self.operator(Arc::clone(&self.stores.node_ports), ResourceType::NodePort),
            );
            summary.merge(ResourceType::NodePort, projection.refresh().await?);
        }

        let totals = summary.totals();
        info!(
            added = totals.added,
            updated = totals.updated,
            deleted = totals.deleted,
            unresolved = totals.unresolved,
            malformed = totals.malformed,
            "pass complete"
        );
        Ok(summary)
    }

    async fn add_and_update_for(
        &self,
        rt: ResourceType,
        snapshot: &Snapshot,
    ) -> RecorderResult<TypeCounts> {
        let cache = &self.cache;
        match rt {
            ResourceType::Region => {
                self.region_updater().handle_add_and_update(cache, &snapshot.regions).await
            }
            ResourceType::Az => self.az_updater().handle_add_and_update(cache, &snapshot.azs).await,
            ResourceType::Vpc => {
                self.vpc_updater().handle_add_and_update(cache, &snapshot.vpcs).await
            }
            ResourceType::Network => {
                self.network_updater().handle_add_and_update(cache, &snapshot.networks).await
            }
            ResourceType::Vm => self.vm_updater().handle_add_and_update(cache, &snapshot.vms).await,
            ResourceType::Vinterface => {
                self.vinterface_updater().handle_add_and_update(cache, &snapshot.vinterfaces).await
            }
            ResourceType::LanIp => {
                self.lan_ip_updater().handle_add_and_update(cache, &snapshot.lan_ips).await
            }
            ResourceType::FloatingIp => {
                self.floating_ip_updater().handle_add_and_update(cache, &snapshot.floating_ips).await
            }
            ResourceType::PodCluster => {
                self.pod_cluster_updater().handle_add_and_update(cache, &snapshot.pod_clusters).await
            }
            ResourceType::PodNode => {
                self.pod_node_updater().handle_add_and_update(cache, &snapshot.pod_nodes).await
            }
            ResourceType::VmPodNodeConnection => {
                self.vm_pod_node_connection_updater()
                    .handle_add_and_update(cache, &snapshot.vm_pod_node_connections)
                    .await
            }
            ResourceType::PodNamespace => {
                self.pod_namespace_updater()
                    .handle_add_and_update(cache, &snapshot.pod_namespaces)
                    .await
            }
            ResourceType::PodGroup => {
                self.pod_group_updater().handle_add_and_update(cache, &snapshot.pod_groups).await
            }
            ResourceType::Pod => {
                self.pod_updater().handle_add_and_update(cache, &snapshot.pods).await
            }
            ResourceType::PodService => {
                self.pod_service_updater().handle_add_and_update(cache, &snapshot.pod_services).await
            }
            ResourceType::PodServicePort => {
                self.pod_service_port_updater()
                    .handle_add_and_update(cache, &snapshot.pod_service_ports)
                    .await
            }
            ResourceType::NodePort => Ok(TypeCounts::default()),
        }
    }

    async fn delete_for(&self, rt: ResourceType, snapshot: &Snapshot) -> RecorderResult<usize> {
        let cache = &self.cache;
        match rt {
            ResourceType::Region => {
                self.region_updater().handle_delete(cache, &snapshot.regions).await
            }
            ResourceType::Az => self.az_updater().handle_delete(cache, &snapshot.azs).await,
            ResourceType::Vpc => self.vpc_updater().handle_delete(cache, &snapshot.vpcs).await,
            ResourceType::Network => {
                self.network_updater().handle_delete(cache, &snapshot.networks).await
            }
            ResourceType::Vm => self.vm_updater().handle_delete(cache, &snapshot.vms).await,
            ResourceType::Vinterface => {
                self.vinterface_updater().handle_delete(cache, &snapshot.vinterfaces).await
            }
            ResourceType::LanIp => {
                self.lan_ip_updater().handle_delete(cache, &snapshot.lan_ips).await
            }
            ResourceType::FloatingIp => {
                self.floating_ip_updater().handle_delete(cache, &snapshot.floating_ips).await
            }
            ResourceType::PodCluster => {
                self.pod_cluster_updater().handle_delete(cache, &snapshot.pod_clusters).await
            }
            ResourceType::PodNode => {
                self.pod_node_updater().handle_delete(cache, &snapshot.pod_nodes).await
            }
            ResourceType::VmPodNodeConnection => {
                self.vm_pod_node_connection_updater()
                    .handle_delete(cache, &snapshot.vm_pod_node_connections)
                    .await
            }
            ResourceType::PodNamespace => {
                self.pod_namespace_updater().handle_delete(cache, &snapshot.pod_namespaces).await
            }
            ResourceType::PodGroup => {
                self.pod_group_updater().handle_delete(cache, &snapshot.pod_groups).await
            }
            ResourceType::Pod => self.pod_updater().handle_delete(cache, &snapshot.pods).await,
            ResourceType::PodService => {
                self.pod_service_updater().handle_delete(cache, &snapshot.pod_services).await
            }
            ResourceType::PodServicePort => {
                self.pod_service_port_updater()
                    .handle_delete(cache, &snapshot.pod_service_ports)
                    .await
            }
            ResourceType::NodePort => Ok(0),
        }
    }

    async fn warm<S: UpdaterStrategy>(&self, updater: &Updater<S>) -> RecorderResult<()> {
        let rows = updater.operator().fetch_all().await?;
        updater.strategy().add_to_cache(&self.cache, &rows);
        Ok(())
    }

    fn operator<R: StoreRow>(
        &self,
        store: Arc<dyn ResourceStore<R>>,
        rt: ResourceType,
    ) -> Operator<R> {
        Operator::new(store, rt, self.config.batch_size)
    }

    fn region_updater(&self) -> Updater<RegionStrategy> {
        Updater::new(
            RegionStrategy,
            self.operator(Arc::clone(&self.stores.regions), ResourceType::Region),
        )
    }

    fn az_updater(&self) -> Updater<AzStrategy> {
        Updater::new(AzStrategy, self.operator(Arc::clone(&self.stores.azs), ResourceType::Az))
    }

    fn vpc_updater(&self) -> Updater<VpcStrategy> {
        Updater::new(VpcStrategy, self.operator(Arc::clone(&self.stores.vpcs), ResourceType::Vpc))
    }

    fn network_updater(&self) -> Updater<NetworkStrategy> {
        Updater::new(
            NetworkStrategy,
            self.operator(Arc::clone(&self.stores.networks), ResourceType::Network),
        )
    }

    fn vm_updater(&self) -> Updater<VmStrategy> {
        Updater::new(VmStrategy, self.operator(Arc::clone(&self.stores.vms), ResourceType::Vm))
    }

    fn vinterface_updater(&self) -> Updater<VinterfaceStrategy> {
        Updater::new(
            VinterfaceStrategy,
            self.operator(Arc::clone(&self.stores.vinterfaces), ResourceType::Vinterface),
        )
    }

    fn lan_ip_updater(&self) -> Updater<LanIpStrategy> {
        Updater::new(
            LanIpStrategy,
            self.operator(Arc::clone(&self.stores.lan_ips), ResourceType::LanIp),
        )
    }

    fn floating_ip_updater(&self) -> Updater<FloatingIpStrategy> {
        Updater::new(
            FloatingIpStrategy,
            self.operator(Arc::clone(&self.stores.floating_ips), ResourceType::FloatingIp),
        )
    }

    fn pod_cluster_updater(&self) -> Updater<PodClusterStrategy> {
        Updater::new(
            PodClusterStrategy,
            self.operator(Arc::clone(&self.stores.pod_clusters), ResourceType::PodCluster),
        )
    }

    fn pod_node_updater(&self) -> Updater<PodNodeStrategy> {
        Updater::new(
            PodNodeStrategy::new(Arc::clone(&self.stores.vm_pod_node_connections)),
            self.operator(Arc::clone(&self.stores.pod_nodes), ResourceType::PodNode),
        )
    }

    fn vm_pod_node_connection_updater(&self) -> Updater<VmPodNodeConnectionStrategy> {
        Updater::new(
            VmPodNodeConnectionStrategy,
            self.operator(
                Arc::clone(&self.stores.vm_pod_node_connections),
                ResourceType::VmPodNodeConnection,
            ),
        )
    }

    fn pod_namespace_updater(&self) -> Updater<PodNamespaceStrategy> {
        Updater::new(
            PodNamespaceStrategy,
            self.operator(Arc::clone(&self.stores.pod_namespaces), ResourceType::PodNamespace),
        )
    }

    fn pod_group_updater(&self) -> Updater<PodGroupStrategy> {
        Updater::new(
            PodGroupStrategy,
            self.operator(Arc::clone(&self.stores.pod_groups), ResourceType::PodGroup),
        )
    }

    fn pod_updater(&self) -> Updater<PodStrategy> {
        Updater::new(PodStrategy, self.operator(Arc::clone(&self.stores.pods), ResourceType::Pod))
    }

    fn pod_service_updater(&self) -> Updater<PodServiceStrategy> {
        Updater::new(
            PodServiceStrategy,
            self.operator(Arc::clone(&self.stores.pod_services), ResourceType::PodService),
        )
    }

    fn pod_service_port_updater(&self) -> Updater<PodServicePortStrategy> {
        Updater::new(
            PodServicePortStrategy,
            self.operator(
                Arc::clone(&self.stores.pod_service_ports),
                ResourceType::PodServicePort,
            ),
        )
    }
}

//! End-to-end pass tests against the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use cartograph_core::{LogicalId, ResourceType, Scope};
use cartograph_db::models::{
    AzRow, FloatingIpRow, NetworkRow, NodePortRow, PodRow, RegionRow, VinterfaceRow,
    VmPodNodeConnectionRow, VmRow, VpcRow,
};
use cartograph_db::MemoryStore;
use cartograph_recorder::snapshot;
use cartograph_recorder::{Recorder, RecorderConfig, Snapshot, Stores};

fn recorder(stores: Stores) -> Recorder {
    let scope = Scope::new("domain-1").unwrap();
    Recorder::new(scope, stores, RecorderConfig::default()).unwrap()
}

fn uid(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

fn az(lcuuid: &str, name: &str) -> snapshot::Az {
    snapshot::Az {
        lcuuid: LogicalId::new(lcuuid),
        name: name.to_string(),
        label: name.to_lowercase(),
        region_lcuuid: LogicalId::new("region-1"),
    }
}

fn vpc(lcuuid: &str, name: &str) -> snapshot::Vpc {
    snapshot::Vpc {
        lcuuid: LogicalId::new(lcuuid),
        name: name.to_string(),
        region_lcuuid: LogicalId::new("region-1"),
    }
}

fn network(lcuuid: &str, vpc_lcuuid: &str) -> snapshot::Network {
    snapshot::Network {
        lcuuid: LogicalId::new(lcuuid),
        name: format!("{lcuuid}-name"),
        vpc_lcuuid: LogicalId::new(vpc_lcuuid),
        az_lcuuid: LogicalId::new("az-1"),
        region_lcuuid: LogicalId::new("region-1"),
    }
}

fn vm(lcuuid: &str, vpc_lcuuid: &str) -> snapshot::Vm {
    snapshot::Vm {
        lcuuid: LogicalId::new(lcuuid),
        name: format!("{lcuuid}-name"),
        label: String::new(),
        state: 4,
        vpc_lcuuid: LogicalId::new(vpc_lcuuid),
        az_lcuuid: LogicalId::new("az-1"),
        region_lcuuid: LogicalId::new("region-1"),
    }
}

fn pod_cluster(lcuuid: &str) -> snapshot::PodCluster {
    snapshot::PodCluster {
        lcuuid: LogicalId::new(lcuuid),
        name: format!("{lcuuid}-name"),
        az_lcuuid: LogicalId::new("az-1"),
        region_lcuuid: LogicalId::new("region-1"),
    }
}

fn pod_node(lcuuid: &str, cluster: &str) -> snapshot::PodNode {
    snapshot::PodNode {
        lcuuid: LogicalId::new(lcuuid),
        name: format!("{lcuuid}-name"),
        state: 1,
        pod_cluster_lcuuid: LogicalId::new(cluster),
        az_lcuuid: LogicalId::new("az-1"),
        region_lcuuid: LogicalId::new("region-1"),
    }
}

fn pod_namespace(lcuuid: &str, cluster: &str) -> snapshot::PodNamespace {
    snapshot::PodNamespace {
        lcuuid: LogicalId::new(lcuuid),
        name: format!("{lcuuid}-name"),
        pod_cluster_lcuuid: LogicalId::new(cluster),
        az_lcuuid: LogicalId::new("az-1"),
        region_lcuuid: LogicalId::new("region-1"),
    }
}

fn pod_service(lcuuid: &str, name: &str, ns: &str, cluster: &str) -> snapshot::PodService {
    snapshot::PodService {
        lcuuid: LogicalId::new(lcuuid),
        name: name.to_string(),
        service_cluster_ip: "10.0.0.10".to_string(),
        pod_namespace_lcuuid: LogicalId::new(ns),
        pod_cluster_lcuuid: LogicalId::new(cluster),
        az_lcuuid: LogicalId::new("az-1"),
        region_lcuuid: LogicalId::new("region-1"),
    }
}

fn pod_service_port(lcuuid: &str, service: &str, node_port: i32) -> snapshot::PodServicePort {
    snapshot::PodServicePort {
        lcuuid: LogicalId::new(lcuuid),
        name: "http".to_string(),
        protocol: "TCP".to_string(),
        port: 80,
        node_port,
        pod_service_lcuuid: LogicalId::new(service),
    }
}

/// A snapshot exercising every resource type with a fully resolvable
/// dependency chain.
fn full_snapshot() -> Snapshot {
    Snapshot {
        regions: vec![snapshot::Region {
            lcuuid: LogicalId::new("region-1"),
            name: "Region 1".to_string(),
        }],
        azs: vec![az("az-1", "AZ1")],
        vpcs: vec![vpc("vpc-1", "prod")],
        networks: vec![network("net-1", "vpc-1")],
        vms: vec![vm("vm-1", "vpc-1")],
        vinterfaces: vec![snapshot::Vinterface {
            lcuuid: LogicalId::new("vif-1"),
            mac: "aa:bb:cc:00:11:22".to_string(),
            network_lcuuid: LogicalId::new("net-1"),
            vm_lcuuid: LogicalId::new("vm-1"),
            region_lcuuid: LogicalId::new("region-1"),
        }],
        lan_ips: vec![snapshot::LanIp {
            lcuuid: LogicalId::new("ip-1"),
            ip: "192.168.1.10".to_string(),
            vinterface_lcuuid: LogicalId::new("vif-1"),
        }],
        floating_ips: vec![snapshot::FloatingIp {
            lcuuid: LogicalId::new("fip-1"),
            ip: "203.0.113.9".to_string(),
            network_lcuuid: LogicalId::new("net-1"),
            vpc_lcuuid: LogicalId::new("vpc-1"),
            vm_lcuuid: LogicalId::new("vm-1"),
            region_lcuuid: LogicalId::new("region-1"),
        }],
        pod_clusters: vec![pod_cluster("cluster-1")],
        pod_nodes: vec![pod_node("node-1", "cluster-1")],
        vm_pod_node_connections: vec![snapshot::VmPodNodeConnection {
            lcuuid: LogicalId::new("conn-1"),
            vm_lcuuid: LogicalId::new("vm-1"),
            pod_node_lcuuid: LogicalId::new("node-1"),
        }],
        pod_namespaces: vec![pod_namespace("ns-1", "cluster-1")],
        pod_groups: vec![snapshot::PodGroup {
            lcuuid: LogicalId::new("grp-1"),
            name: "web".to_string(),
            label: "app=web".to_string(),
            pod_num: 2,
            pod_namespace_lcuuid: LogicalId::new("ns-1"),
            pod_cluster_lcuuid: LogicalId::new("cluster-1"),
            az_lcuuid: LogicalId::new("az-1"),
            region_lcuuid: LogicalId::new("region-1"),
        }],
        pods: vec![snapshot::Pod {
            lcuuid: LogicalId::new("pod-1"),
            name: "web-0".to_string(),
            state: 1,
            pod_group_lcuuid: LogicalId::new("grp-1"),
            pod_node_lcuuid: LogicalId::new("node-1"),
            pod_namespace_lcuuid: LogicalId::new("ns-1"),
            pod_cluster_lcuuid: LogicalId::new("cluster-1"),
            az_lcuuid: LogicalId::new("az-1"),
            region_lcuuid: LogicalId::new("region-1"),
        }],
        pod_services: vec![pod_service("svc-1", "web", "ns-1", "cluster-1")],
        pod_service_ports: vec![pod_service_port("port-1", "svc-1", 30080)],
    }
}

#[tokio::test]
async fn test_add_resolves_surrogate_key_and_name() {
    let az_store = Arc::new(MemoryStore::<AzRow>::new());
    let mut stores = Stores::in_memory();
    stores.azs = az_store.clone();
    let recorder = recorder(stores);

    let snapshot = Snapshot {
        azs: vec![az("az-1", "AZ1")],
        ..Snapshot::default()
    };
    let summary = recorder.run_pass(&snapshot).await.unwrap();

    assert_eq!(summary.counts[&ResourceType::Az].added, 1);
    assert_eq!(az_store.insert_calls(), 1);
    let row = az_store.get("az-1").unwrap();
    let cache = recorder.cache();
    assert_eq!(cache.tool.az_id_by_lcuuid("az-1"), Some(row.id));
    assert_eq!(
        cache.tool.name_by_lcuuid(ResourceType::Az, "az-1").as_deref(),
        Some("AZ1")
    );
}

#[tokio::test]
async fn test_update_issues_field_diff_only() {
    let az_store = Arc::new(MemoryStore::<AzRow>::new());
    let mut stores = Stores::in_memory();
    stores.azs = az_store.clone();
    let recorder = recorder(stores);

    let first = Snapshot {
        azs: vec![az("az-1", "AZ1")],
        ..Snapshot::default()
    };
    recorder.run_pass(&first).await.unwrap();
    let key = az_store.get("az-1").unwrap().id;

    let mut renamed = az("az-1", "AZ1-new");
    renamed.label = "az1".to_string();
    let second = Snapshot {
        azs: vec![renamed],
        ..Snapshot::default()
    };
    let summary = recorder.run_pass(&second).await.unwrap();

    assert_eq!(summary.counts[&ResourceType::Az].updated, 1);
    assert_eq!(az_store.insert_calls(), 1);
    assert_eq!(az_store.update_calls(), 1);
    let row = az_store.get("az-1").unwrap();
    assert_eq!(row.name, "AZ1-new");
    assert_eq!(row.id, key);
    let cache = recorder.cache();
    assert_eq!(cache.tool.az_id_by_lcuuid("az-1"), Some(key));
    assert_eq!(
        cache.tool.name_by_lcuuid(ResourceType::Az, "az-1").as_deref(),
        Some("AZ1-new")
    );
}

#[tokio::test]
async fn test_absent_from_snapshot_deletes_from_store_and_cache() {
    let az_store = Arc::new(MemoryStore::<AzRow>::new());
    let mut stores = Stores::in_memory();
    stores.azs = az_store.clone();
    let recorder = recorder(stores);

    let first = Snapshot {
        azs: vec![az("az-1", "AZ1")],
        ..Snapshot::default()
    };
    recorder.run_pass(&first).await.unwrap();

    let summary = recorder.run_pass(&Snapshot::default()).await.unwrap();

    assert_eq!(summary.counts[&ResourceType::Az].deleted, 1);
    assert!(az_store.get("az-1").is_none());
    let cache = recorder.cache();
    assert_eq!(cache.tool.az_id_by_lcuuid("az-1"), None);
    assert_eq!(cache.tool.name_by_lcuuid(ResourceType::Az, "az-1"), None);
    assert!(cache.azs.is_empty());
}

#[tokio::test]
async fn test_unresolved_reference_skips_item_without_store_write() {
    let fip_store = Arc::new(MemoryStore::<FloatingIpRow>::new());
    let mut stores = Stores::in_memory();
    stores.floating_ips = fip_store.clone();
    let recorder = recorder(stores);

    // The floating IP points at a network the snapshot never delivers.
    let snapshot = Snapshot {
        vpcs: vec![vpc("vpc-1", "prod")],
        vms: vec![vm("vm-1", "vpc-1")],
        floating_ips: vec![snapshot::FloatingIp {
            lcuuid: LogicalId::new("fip-1"),
            ip: "203.0.113.9".to_string(),
            network_lcuuid: LogicalId::new("net-missing"),
            vpc_lcuuid: LogicalId::new("vpc-1"),
            vm_lcuuid: LogicalId::new("vm-1"),
            region_lcuuid: LogicalId::new("region-1"),
        }],
        ..Snapshot::default()
    };
    let summary = recorder.run_pass(&snapshot).await.unwrap();

    assert_eq!(summary.counts[&ResourceType::FloatingIp].unresolved, 1);
    assert_eq!(fip_store.insert_calls(), 0);
    assert!(fip_store.is_empty());
    assert!(recorder.cache().floating_ips.is_empty());
}

#[tokio::test]
async fn test_pod_node_delete_cascades_to_connections() {
    let conn_store = Arc::new(MemoryStore::<VmPodNodeConnectionRow>::new());
    let mut stores = Stores::in_memory();
    stores.vm_pod_node_connections = conn_store.clone();
    let recorder = recorder(stores);

    recorder.run_pass(&full_snapshot()).await.unwrap();
    assert!(conn_store.get("conn-1").is_some());

    // Drop the node but keep the join item; the cascade must clean it up.
    let mut second = full_snapshot();
    second.pod_nodes.clear();
    second.pods.clear();
    recorder.run_pass(&second).await.unwrap();

    assert!(conn_store.get("conn-1").is_none());
    let cache = recorder.cache();
    assert_eq!(cache.tool.pod_node_id_by_lcuuid("node-1"), None);
    assert_eq!(cache.tool.vm_pod_node_connection_id_by_lcuuid("conn-1"), None);
    assert!(cache.vm_pod_node_connections.is_empty());
}

#[tokio::test]
async fn test_identical_snapshot_is_idempotent() {
    let az_store = Arc::new(MemoryStore::<AzRow>::new());
    let vm_store = Arc::new(MemoryStore::<VmRow>::new());
    let vif_store = Arc::new(MemoryStore::<VinterfaceRow>::new());
    let pod_store = Arc::new(MemoryStore::<PodRow>::new());
    let node_port_store = Arc::new(MemoryStore::<NodePortRow>::new());
    let mut stores = Stores::in_memory();
    stores.azs = az_store.clone();
    stores.vms = vm_store.clone();
    stores.vinterfaces = vif_store.clone();
    stores.pods = pod_store.clone();
    stores.node_ports = node_port_store.clone();
    let recorder = recorder(stores);

    let snapshot = full_snapshot();
    let first = recorder.run_pass(&snapshot).await.unwrap();
    assert!(first.totals().added > 0);

    let writes_before = (
        az_store.insert_calls() + az_store.update_calls() + az_store.delete_calls(),
        vm_store.insert_calls() + vm_store.update_calls() + vm_store.delete_calls(),
        vif_store.insert_calls() + vif_store.update_calls() + vif_store.delete_calls(),
        pod_store.insert_calls() + pod_store.update_calls() + pod_store.delete_calls(),
        node_port_store.insert_calls()
            + node_port_store.update_calls()
            + node_port_store.delete_calls(),
    );

    let second = recorder.run_pass(&snapshot).await.unwrap();
    assert!(second.totals().is_noop());

    let writes_after = (
        az_store.insert_calls() + az_store.update_calls() + az_store.delete_calls(),
        vm_store.insert_calls() + vm_store.update_calls() + vm_store.delete_calls(),
        vif_store.insert_calls() + vif_store.update_calls() + vif_store.delete_calls(),
        pod_store.insert_calls() + pod_store.update_calls() + pod_store.delete_calls(),
        node_port_store.insert_calls()
            + node_port_store.update_calls()
            + node_port_store.delete_calls(),
    );
    assert_eq!(writes_before, writes_after);
}

#[tokio::test]
async fn test_dependent_converges_once_dependency_arrives() {
    let vif_store = Arc::new(MemoryStore::<VinterfaceRow>::new());
    let mut stores = Stores::in_memory();
    stores.vinterfaces = vif_store.clone();
    let recorder = recorder(stores);

    let vif_id = uid("vif");
    let vif = snapshot::Vinterface {
        lcuuid: LogicalId::new(vif_id.clone()),
        mac: "aa:bb:cc:00:11:22".to_string(),
        network_lcuuid: LogicalId::new("net-1"),
        vm_lcuuid: LogicalId::new("vm-1"),
        region_lcuuid: LogicalId::new("region-1"),
    };

    // The interface's network is missing in the first cycle.
    let first = Snapshot {
        vpcs: vec![vpc("vpc-1", "prod")],
        vms: vec![vm("vm-1", "vpc-1")],
        vinterfaces: vec![vif.clone()],
        ..Snapshot::default()
    };
    let summary = recorder.run_pass(&first).await.unwrap();
    assert_eq!(summary.counts[&ResourceType::Vinterface].unresolved, 1);
    assert!(vif_store.get(&vif_id).is_none());

    let second = Snapshot {
        networks: vec![network("net-1", "vpc-1")],
        ..first.clone()
    };
    let summary = recorder.run_pass(&second).await.unwrap();
    assert_eq!(summary.counts[&ResourceType::Vinterface].added, 1);
    assert!(vif_store.get(&vif_id).is_some());
    assert!(recorder.cache().tool.network_id_by_vinterface(&vif_id).is_some());
}

#[tokio::test]
async fn test_cache_and_store_agree_on_surrogate_keys() {
    let vpc_store = Arc::new(MemoryStore::<VpcRow>::new());
    let net_store = Arc::new(MemoryStore::<NetworkRow>::new());
    let mut stores = Stores::in_memory();
    stores.vpcs = vpc_store.clone();
    stores.networks = net_store.clone();
    let recorder = recorder(stores);

    let snapshot = Snapshot {
        vpcs: vec![vpc("vpc-1", "prod"), vpc("vpc-2", "staging")],
        networks: vec![network("net-1", "vpc-1"), network("net-2", "vpc-2")],
        ..Snapshot::default()
    };
    recorder.run_pass(&snapshot).await.unwrap();

    let cache = recorder.cache();
    for lcuuid in ["vpc-1", "vpc-2"] {
        let row = vpc_store.get(lcuuid).unwrap();
        assert_eq!(cache.tool.vpc_id_by_lcuuid(lcuuid), Some(row.id));
    }
    for lcuuid in ["net-1", "net-2"] {
        let row = net_store.get(lcuuid).unwrap();
        assert_eq!(cache.tool.network_id_by_lcuuid(lcuuid), Some(row.id));
        assert_eq!(
            row.vpc_id,
            cache.tool.vpc_id_by_lcuuid(if lcuuid == "net-1" { "vpc-1" } else { "vpc-2" }).unwrap()
        );
    }
}

#[tokio::test]
async fn test_unreachable_store_aborts_pass_and_next_pass_heals() {
    let region_store = Arc::new(MemoryStore::<RegionRow>::new());
    let vpc_store = Arc::new(MemoryStore::<VpcRow>::new());
    let mut stores = Stores::in_memory();
    stores.regions = region_store.clone();
    stores.vpcs = vpc_store.clone();
    let recorder = recorder(stores);

    let snapshot = Snapshot {
        regions: vec![snapshot::Region {
            lcuuid: LogicalId::new("region-1"),
            name: "Region 1".to_string(),
        }],
        vpcs: vec![vpc("vpc-1", "prod")],
        ..Snapshot::default()
    };

    vpc_store.set_unreachable(true);
    assert!(recorder.run_pass(&snapshot).await.is_err());
    // Regions reconcile before VPCs, so the confirmed part stays.
    assert!(region_store.get("region-1").is_some());
    assert!(vpc_store.is_empty());

    vpc_store.set_unreachable(false);
    let summary = recorder.run_pass(&snapshot).await.unwrap();
    assert_eq!(summary.counts[&ResourceType::Vpc].added, 1);
    assert!(summary.counts.get(&ResourceType::Region).is_none());
    assert_eq!(region_store.len(), 1);
    assert!(vpc_store.get("vpc-1").is_some());
}

#[tokio::test]
async fn test_warm_start_issues_no_writes_for_unchanged_state() {
    let vpc_store = Arc::new(MemoryStore::<VpcRow>::new());
    let net_store = Arc::new(MemoryStore::<NetworkRow>::new());
    let seeded_vpc = vpc_store.seed(VpcRow {
        lcuuid: "vpc-1".to_string(),
        domain: "domain-1".to_string(),
        name: "prod".to_string(),
        region: "region-1".to_string(),
        ..VpcRow::default()
    });
    net_store.seed(NetworkRow {
        lcuuid: "net-1".to_string(),
        domain: "domain-1".to_string(),
        name: "net-1-name".to_string(),
        vpc_id: seeded_vpc.id,
        az: "az-1".to_string(),
        region: "region-1".to_string(),
        ..NetworkRow::default()
    });

    let mut stores = Stores::in_memory();
    stores.vpcs = vpc_store.clone();
    stores.networks = net_store.clone();
    let recorder = recorder(stores);
    recorder.load_from_store().await.unwrap();
    assert_eq!(recorder.cache().tool.vpc_id_by_lcuuid("vpc-1"), Some(seeded_vpc.id));

    let snapshot = Snapshot {
        vpcs: vec![vpc("vpc-1", "prod")],
        networks: vec![network("net-1", "vpc-1")],
        ..Snapshot::default()
    };
    let summary = recorder.run_pass(&snapshot).await.unwrap();

    assert!(summary.totals().is_noop());
    assert_eq!(vpc_store.insert_calls(), 0);
    assert_eq!(vpc_store.update_calls(), 0);
    assert_eq!(net_store.insert_calls(), 0);
    assert_eq!(net_store.update_calls(), 0);
}

#[tokio::test]
async fn test_node_port_projection_follows_primary_tables() {
    let node_port_store = Arc::new(MemoryStore::<NodePortRow>::new());
    let mut stores = Stores::in_memory();
    stores.node_ports = node_port_store.clone();
    let recorder = recorder(stores);

    recorder.run_pass(&full_snapshot()).await.unwrap();
    let node_id = recorder.cache().tool.pod_node_id_by_lcuuid("node-1").unwrap();
    let key = format!("{node_id}/TCP/30080");
    let row = node_port_store.get(&key).unwrap();
    assert_eq!(row.pod_service_name, "web");
    assert_eq!(row.port, 30080);

    // Renaming the service flows into the denormalized column.
    let mut renamed = full_snapshot();
    renamed.pod_services[0].name = "web-v2".to_string();
    recorder.run_pass(&renamed).await.unwrap();
    assert_eq!(node_port_store.get(&key).unwrap().pod_service_name, "web-v2");

    // Dropping the port removes the projection row.
    let mut dropped = renamed.clone();
    dropped.pod_service_ports.clear();
    recorder.run_pass(&dropped).await.unwrap();
    assert!(node_port_store.get(&key).is_none());
    assert!(node_port_store.is_empty());
}

#[tokio::test]
async fn test_empty_logical_id_is_skipped_as_malformed() {
    let az_store = Arc::new(MemoryStore::<AzRow>::new());
    let mut stores = Stores::in_memory();
    stores.azs = az_store.clone();
    let recorder = recorder(stores);

    let snapshot = Snapshot {
        azs: vec![az("", "nameless"), az("az-1", "AZ1")],
        ..Snapshot::default()
    };
    let summary = recorder.run_pass(&snapshot).await.unwrap();

    assert_eq!(summary.counts[&ResourceType::Az].malformed, 1);
    assert_eq!(summary.counts[&ResourceType::Az].added, 1);
    assert_eq!(az_store.len(), 1);
}

#[tokio::test]
async fn test_soft_deleted_resource_reappearing_is_re_added() {
    let vm_store = Arc::new(MemoryStore::<VmRow>::new());
    let mut stores = Stores::in_memory();
    stores.vms = vm_store.clone();
    let recorder = recorder(stores);

    let with_vm = Snapshot {
        vpcs: vec![vpc("vpc-1", "prod")],
        vms: vec![vm("vm-1", "vpc-1")],
        ..Snapshot::default()
    };
    recorder.run_pass(&with_vm).await.unwrap();
    let first_key = vm_store.get("vm-1").unwrap().id;

    // The vm drops out of the snapshot and is tombstoned.
    let without_vm = Snapshot {
        vpcs: vec![vpc("vpc-1", "prod")],
        ..Snapshot::default()
    };
    recorder.run_pass(&without_vm).await.unwrap();
    assert!(vm_store.get("vm-1").is_none());

    // The tombstone must not block the vm coming back.
    let summary = recorder.run_pass(&with_vm).await.unwrap();
    assert_eq!(summary.counts[&ResourceType::Vm].added, 1);
    let revived = vm_store.get("vm-1").unwrap();
    assert!(revived.deleted_at.is_none());
    assert_ne!(revived.id, first_key);
    let cache = recorder.cache();
    assert_eq!(cache.tool.vm_id_by_lcuuid("vm-1"), Some(revived.id));
    assert!(cache.vms.contains(&LogicalId::new("vm-1")));
}

#[test]
fn test_readers_never_observe_a_partial_batch() {
    use cartograph_recorder::cache::DiffMap;
    use cartograph_recorder::ToolDataSet;
    use std::sync::atomic::{AtomicBool, Ordering};

    const BATCH: usize = 512;
    let map: DiffMap<i32> = DiffMap::new();
    let tool = ToolDataSet::new();
    let done = AtomicBool::new(false);
    let bases: Vec<(LogicalId, i32)> = (0..BATCH)
        .map(|i| (LogicalId::new(format!("vpc-{i}")), i as i32))
        .collect();
    let ids = bases.clone();

    std::thread::scope(|s| {
        let (map, tool, done) = (&map, &tool, &done);
        for _ in 0..4 {
            s.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    // insert_batch is one critical section, so a reader
                    // sees the whole batch or none of it.
                    let len = map.len();
                    assert!(len == 0 || len == BATCH, "partial batch visible: {len}");
                    let _ = tool.vpc_id_by_lcuuid("vpc-511");
                }
            });
        }
        s.spawn(move || {
            map.insert_batch(bases);
            tool.add_vpcs(ids);
            done.store(true, Ordering::Release);
        });
    });

    assert_eq!(map.len(), BATCH);
    assert_eq!(tool.vpc_id_by_lcuuid("vpc-511"), Some(511));
}

use axum::{Router, middleware, routing::get};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::AppState;
use crate::handlers::{clusters, nodes, quotas};
use crate::request_id::request_id_middleware;
use pkg_sources::snapshot::SnapshotProvider;
use pkg_types::cluster::Cluster;

/// Server configuration passed from the binary's CLI.
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub snapshot_dir: PathBuf,
    pub clusters: Vec<Cluster>,
}

/// All routes, wired to `state`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/v1/clusters", get(clusters::list_clusters))
        .route("/api/v1/clusters/{cluster}/nodes", get(nodes::list_nodes))
        .route(
            "/api/v1/clusters/{cluster}/nodes/{node}/pods",
            get(nodes::node_pods),
        )
        .route("/api/v1/clusters/{cluster}/quotas", get(quotas::list_quotas));

    Router::new()
        .route("/healthz", get(clusters::healthz))
        .merge(api_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    for cluster in &config.clusters {
        pkg_types::validate::validate_cluster_id(&cluster.id)?;
    }
    info!(
        "Serving {} clusters from {}",
        config.clusters.len(),
        config.snapshot_dir.display()
    );

    let provider = SnapshotProvider::new(config.snapshot_dir);
    let state = AppState::new(Arc::new(provider), config.clusters);
    let app = build_router(state);

    info!("Starting API server on {}", config.addr);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pkg_sources::{
        ClusterSources, InventorySource, MetricSource, PodSource, QuotaSource, SourceProvider,
    };
    use pkg_types::node::{NodeInventory, NodeMetric, ResourceStat};
    use pkg_types::pod::{ContainerSpec, Pod, PodSpec, ResourceRequirements};
    use pkg_types::quota::ResourceQuota;
    use serde_json::Value;
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    /// In-memory collaborator; `None` fields fail their listing.
    #[derive(Clone, Default)]
    struct FakeSource {
        nodes: Option<Vec<NodeInventory>>,
        metrics: Option<Vec<NodeMetric>>,
        namespaces: Option<Vec<String>>,
        quotas: Vec<ResourceQuota>,
        failing_namespaces: Vec<String>,
        pods: Option<Vec<Pod>>,
    }

    #[async_trait]
    impl InventorySource for FakeSource {
        async fn list_nodes(&self) -> anyhow::Result<Vec<NodeInventory>> {
            match &self.nodes {
                Some(n) => Ok(n.clone()),
                None => bail!("inventory down"),
            }
        }
    }

    #[async_trait]
    impl MetricSource for FakeSource {
        async fn node_metrics(&self) -> anyhow::Result<Vec<NodeMetric>> {
            match &self.metrics {
                Some(m) => Ok(m.clone()),
                None => bail!("metrics down"),
            }
        }
    }

    #[async_trait]
    impl QuotaSource for FakeSource {
        async fn list_namespaces(&self) -> anyhow::Result<Vec<String>> {
            match &self.namespaces {
                Some(n) => Ok(n.clone()),
                None => bail!("namespace listing down"),
            }
        }

        async fn list_quotas(&self, namespace: &str) -> anyhow::Result<Vec<ResourceQuota>> {
            if self.failing_namespaces.iter().any(|ns| ns == namespace) {
                bail!("quota listing for {} down", namespace);
            }
            Ok(self
                .quotas
                .iter()
                .filter(|q| q.namespace == namespace)
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl PodSource for FakeSource {
        async fn list_pods(&self) -> anyhow::Result<Vec<Pod>> {
            match &self.pods {
                Some(p) => Ok(p.clone()),
                None => bail!("pod listing down"),
            }
        }
    }

    struct FakeProvider(FakeSource);

    impl SourceProvider for FakeProvider {
        fn sources(&self, _cluster_id: &str) -> ClusterSources {
            ClusterSources::from_single(self.0.clone())
        }
    }

    fn make_quota(namespace: &str, cpu_limit: &str) -> ResourceQuota {
        ResourceQuota {
            name: "compute".to_string(),
            namespace: namespace.to_string(),
            hard: BTreeMap::from([("limits.cpu".to_string(), cpu_limit.to_string())]),
            used: BTreeMap::new(),
        }
    }

    fn healthy_source() -> FakeSource {
        let gpu_pod = Pod {
            name: "trainer-0".to_string(),
            namespace: "aip-training".to_string(),
            node_name: Some("n1".to_string()),
            spec: PodSpec {
                containers: vec![ContainerSpec {
                    name: "main".to_string(),
                    resources: ResourceRequirements {
                        limits: BTreeMap::from([("nvidia.com/gpu".to_string(), "2".to_string())]),
                        requests: BTreeMap::new(),
                    },
                }],
            },
        };
        FakeSource {
            nodes: Some(vec![NodeInventory {
                name: "n1".to_string(),
                unschedulable: false,
                cpu: ResourceStat::new("4", "3900m", "1500m"),
                memory: ResourceStat::new("16Gi", "15Gi", "8Gi"),
                gpus: BTreeMap::new(),
            }]),
            metrics: Some(vec![NodeMetric {
                node: "n1".to_string(),
                cpu_usage_percentage: Some(42.0),
                ..Default::default()
            }]),
            namespaces: Some(vec!["aip-a".to_string(), "aip-b".to_string()]),
            quotas: vec![make_quota("aip-a", "10"), make_quota("aip-a", "5"), make_quota("aip-b", "1")],
            failing_namespaces: vec![],
            pods: Some(vec![gpu_pod]),
        }
    }

    fn app(source: FakeSource) -> Router {
        let clusters = vec![Cluster {
            id: "cluster-1".to_string(),
            name: "production-cluster".to_string(),
        }];
        build_router(AppState::new(Arc::new(FakeProvider(source)), clusters))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_list_clusters() {
        let (status, headers, body) = get_json(app(healthy_source()), "/api/v1/clusters").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(body[0]["id"], "cluster-1");
        assert_eq!(body[0]["name"], "production-cluster");
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_cluster() {
        let (status, _, body) = get_json(app(healthy_source()), "/api/v1/clusters/cluster-9/nodes").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("cluster-9"));

        let (status, _, _) = get_json(app(healthy_source()), "/api/v1/clusters/Bad_Id/quotas").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_node_view_merges_metrics_and_pods() {
        let (status, headers, body) =
            get_json(app(healthy_source()), "/api/v1/clusters/cluster-1/nodes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-kheat-baseline"], "false");

        let node = &body[0];
        assert_eq!(node["name"], "n1");
        assert_eq!(node["cpu"]["usagePercentage"], 42.0);
        assert!(node["memory"].get("usagePercentage").is_none());
        assert_eq!(node["pods"][0]["name"], "trainer-0");
        assert_eq!(node["pods"][0]["gpuCount"], 2.0);
    }

    #[tokio::test]
    async fn test_node_view_falls_back_to_baseline() {
        let source = FakeSource {
            metrics: None,
            ..healthy_source()
        };
        let (status, headers, body) = get_json(app(source), "/api/v1/clusters/cluster-1/nodes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-kheat-baseline"], "true");
        assert_eq!(body.as_array().unwrap().len(), 4);
        assert_eq!(body[0]["name"], "mig-node-1");
    }

    #[tokio::test]
    async fn test_inventory_failure_also_falls_back_to_baseline() {
        let source = FakeSource {
            nodes: None,
            ..healthy_source()
        };
        let (status, headers, body) = get_json(app(source), "/api/v1/clusters/cluster-1/nodes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-kheat-baseline"], "true");
        assert_eq!(body.as_array().unwrap().len(), 4);
        assert!(body.as_array().unwrap().iter().all(|n| n["name"] != "n1"));
    }

    #[tokio::test]
    async fn test_node_view_survives_pod_failure() {
        let source = FakeSource {
            pods: None,
            ..healthy_source()
        };
        let (_, headers, body) = get_json(app(source), "/api/v1/clusters/cluster-1/nodes").await;
        assert_eq!(headers["x-kheat-baseline"], "false");
        assert_eq!(body[0]["cpu"]["usagePercentage"], 42.0);
        assert!(body[0]["pods"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quotas_sum_and_isolate_failures() {
        let (status, _, body) = get_json(app(healthy_source()), "/api/v1/clusters/cluster-1/quotas").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["namespace"], "aip-a");
        assert_eq!(body[0]["cpu"]["limit"], "15.0");

        let source = FakeSource {
            failing_namespaces: vec!["aip-a".to_string()],
            ..healthy_source()
        };
        let (status, _, body) = get_json(app(source), "/api/v1/clusters/cluster-1/quotas").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["namespace"], "aip-b");
    }

    #[tokio::test]
    async fn test_repeated_namespace_is_summarized_once() {
        let source = FakeSource {
            namespaces: Some(vec!["aip-a".to_string(), "aip-a".to_string(), "aip-b".to_string()]),
            ..healthy_source()
        };
        let (status, _, body) = get_json(app(source), "/api/v1/clusters/cluster-1/quotas").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["namespace"], "aip-a");
        assert_eq!(body[0]["cpu"]["limit"], "15.0");
    }

    #[tokio::test]
    async fn test_quotas_unavailable() {
        let source = FakeSource {
            namespaces: None,
            ..healthy_source()
        };
        let (status, _, body) = get_json(app(source), "/api/v1/clusters/cluster-1/quotas").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_node_pods() {
        let (status, _, body) =
            get_json(app(healthy_source()), "/api/v1/clusters/cluster-1/nodes/n1/pods").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["namespace"], "aip-training");

        let (_, _, body) =
            get_json(app(healthy_source()), "/api/v1/clusters/cluster-1/nodes/n2/pods").await;
        assert!(body.as_array().unwrap().is_empty());

        let source = FakeSource {
            pods: None,
            ..healthy_source()
        };
        let (status, _, _) = get_json(app(source), "/api/v1/clusters/cluster-1/nodes/n1/pods").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_healthz() {
        let resp = app(healthy_source())
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

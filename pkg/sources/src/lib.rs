//! Collaborators that feed the core: node inventory, usage metrics, namespace
//! quotas, and pod listings.

pub mod baseline;
pub mod snapshot;

use async_trait::async_trait;
use pkg_types::node::{NodeInventory, NodeMetric};
use pkg_types::pod::Pod;
use pkg_types::quota::ResourceQuota;
use std::sync::Arc;

/// Node capacity/allocatable and cordon state.
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn list_nodes(&self) -> anyhow::Result<Vec<NodeInventory>>;
}

/// Per-node and per-GPU-resource usage percentages.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn node_metrics(&self) -> anyhow::Result<Vec<NodeMetric>>;
}

/// Namespace quota objects. Listings are per namespace so one failing
/// namespace does not take the others down.
#[async_trait]
pub trait QuotaSource: Send + Sync {
    async fn list_namespaces(&self) -> anyhow::Result<Vec<String>>;
    async fn list_quotas(&self, namespace: &str) -> anyhow::Result<Vec<ResourceQuota>>;
}

/// Pods with their node assignment and container limits.
#[async_trait]
pub trait PodSource: Send + Sync {
    async fn list_pods(&self) -> anyhow::Result<Vec<Pod>>;
}

/// The four collaborators for one cluster.
#[derive(Clone)]
pub struct ClusterSources {
    pub inventory: Arc<dyn InventorySource>,
    pub metrics: Arc<dyn MetricSource>,
    pub quotas: Arc<dyn QuotaSource>,
    pub pods: Arc<dyn PodSource>,
}

impl ClusterSources {
    /// Serve all four from a single source object.
    pub fn from_single<S>(source: S) -> Self
    where
        S: InventorySource + MetricSource + QuotaSource + PodSource + 'static,
    {
        let source = Arc::new(source);
        Self {
            inventory: source.clone(),
            metrics: source.clone(),
            quotas: source.clone(),
            pods: source,
        }
    }
}

/// Resolves a cluster ID to its collaborators.
pub trait SourceProvider: Send + Sync {
    fn sources(&self, cluster_id: &str) -> ClusterSources;
}

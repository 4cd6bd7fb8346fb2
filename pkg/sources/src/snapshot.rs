use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pkg_constants::paths::SNAPSHOT_EXTENSION;
use pkg_metrics::{CPU_QUERY, GPU_QUERY, MEMORY_QUERY, QueryResponse};
use pkg_types::node::{NodeInventory, NodeMetric};
use pkg_types::pod::Pod;
use pkg_types::quota::ResourceQuota;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::debug;

use crate::{ClusterSources, InventorySource, MetricSource, PodSource, QuotaSource, SourceProvider};

/// Captured `/api/v1/query` responses for the three node queries, collated
/// into `NodeMetric`s on read. A missing response counts as an empty vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrometheusVectors {
    #[serde(default)]
    pub cpu: Option<QueryResponse>,
    #[serde(default)]
    pub memory: Option<QueryResponse>,
    #[serde(default)]
    pub gpu: Option<QueryResponse>,
}

impl PrometheusVectors {
    pub fn collate(self) -> Vec<NodeMetric> {
        let samples = |response: Option<QueryResponse>, query: &str| match response {
            Some(r) => r.into_samples(query),
            None => {
                debug!("No captured response for `{}`", query);
                Vec::new()
            }
        };
        let cpu = samples(self.cpu, CPU_QUERY);
        let memory = samples(self.memory, MEMORY_QUERY);
        let gpu = samples(self.gpu, GPU_QUERY);
        pkg_metrics::collate(&cpu, &memory, &gpu)
    }
}

/// Everything the collaborators know about one cluster, as one document.
///
/// Example `cluster-1.yaml`:
/// ```yaml
/// capturedAt: 2026-01-01T00:00:00Z
/// nodes:
///   - name: mig-node-1
///     cpu: { capacity: "32", allocatable: "31500m", usage: "14" }
///     memory: { capacity: 256Gi, allocatable: 250Gi, usage: 150Gi }
///     gpus:
///       nvidia.com/mig-1g.5gb: { capacity: "7", allocatable: "7", usage: "5" }
/// metrics:
///   - node: mig-node-1
///     cpuUsagePercentage: 45.5
/// prometheus:
///   memory:
///     status: success
///     data:
///       resultType: vector
///       result:
///         - metric: { instance: "mig-node-2:9100" }
///           value: [1700000000, "75.8"]
/// quotas:
///   - name: compute
///     namespace: aip-training
///     hard: { limits.cpu: "100" }
///     used: { limits.cpu: "42" }
/// unavailable: [aip-sandbox]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nodes: Vec<NodeInventory>,
    #[serde(default)]
    pub metrics: Vec<NodeMetric>,
    #[serde(default)]
    pub prometheus: Option<PrometheusVectors>,
    /// Namespaces to list for quotas. Derived from `quotas` when empty.
    #[serde(default)]
    pub namespaces: Vec<String>,
    #[serde(default)]
    pub quotas: Vec<ResourceQuota>,
    #[serde(default)]
    pub pods: Vec<Pod>,
    /// Namespaces whose quota listing fails.
    #[serde(default)]
    pub unavailable: Vec<String>,
}

impl ClusterSnapshot {
    fn namespaces(&self) -> Vec<String> {
        if !self.namespaces.is_empty() {
            return self.namespaces.clone();
        }
        self.quotas
            .iter()
            .map(|q| q.namespace.clone())
            .chain(self.unavailable.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Reads a cluster snapshot file. The file is re-read on every call.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> anyhow::Result<ClusterSnapshot> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading snapshot {}", self.path.display()))?;
        let snapshot: ClusterSnapshot = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing snapshot {}", self.path.display()))?;
        if let Some(captured_at) = snapshot.captured_at {
            let age = Utc::now().signed_duration_since(captured_at);
            debug!(
                "Loaded snapshot {} (captured {}s ago)",
                self.path.display(),
                age.num_seconds()
            );
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl InventorySource for SnapshotSource {
    async fn list_nodes(&self) -> anyhow::Result<Vec<NodeInventory>> {
        Ok(self.load().await?.nodes)
    }
}

#[async_trait]
impl MetricSource for SnapshotSource {
    async fn node_metrics(&self) -> anyhow::Result<Vec<NodeMetric>> {
        let snapshot = self.load().await?;
        let mut metrics = snapshot.metrics;
        if let Some(prom) = snapshot.prometheus {
            metrics.extend(prom.collate());
        }
        Ok(metrics)
    }
}

#[async_trait]
impl QuotaSource for SnapshotSource {
    async fn list_namespaces(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.load().await?.namespaces())
    }

    async fn list_quotas(&self, namespace: &str) -> anyhow::Result<Vec<ResourceQuota>> {
        let snapshot = self.load().await?;
        if snapshot.unavailable.iter().any(|ns| ns == namespace) {
            bail!("quota listing for namespace {} is unavailable", namespace);
        }
        Ok(snapshot
            .quotas
            .into_iter()
            .filter(|q| q.namespace == namespace)
            .collect())
    }
}

#[async_trait]
impl PodSource for SnapshotSource {
    async fn list_pods(&self) -> anyhow::Result<Vec<Pod>> {
        Ok(self.load().await?.pods)
    }
}

/// Maps cluster IDs to `<dir>/<cluster-id>.yaml`.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    dir: PathBuf,
}

impl SnapshotProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, cluster_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", cluster_id, SNAPSHOT_EXTENSION))
    }
}

impl SourceProvider for SnapshotProvider {
    fn sources(&self, cluster_id: &str) -> ClusterSources {
        ClusterSources::from_single(SnapshotSource::new(self.path_for(cluster_id)))
    }
}

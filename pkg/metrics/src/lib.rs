//! Collation of Prometheus instant-vector results into per-node metric
//! records.
//!
//! Input is whatever `/api/v1/query` returned for [`CPU_QUERY`],
//! [`MEMORY_QUERY`], and [`GPU_QUERY`], already deserialized. Nothing in
//! this crate talks to Prometheus.

use pkg_constants::resources::{GPU_RESOURCE_NAME, GPU_RESOURCE_PREFIX};
use pkg_types::node::{GpuMetric, NodeMetric};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Busy CPU percentage per instance over the last five minutes.
pub const CPU_QUERY: &str =
    r#"100 - (avg by (instance) (rate(node_cpu_seconds_total{mode="idle"}[5m])) * 100)"#;

/// Used memory percentage per instance.
pub const MEMORY_QUERY: &str =
    "(node_memory_MemTotal_bytes - node_memory_MemAvailable_bytes) / node_memory_MemTotal_bytes * 100";

/// GPU utilization per instance, device, and MIG profile.
pub const GPU_QUERY: &str = "avg by (instance, gpu, mig_profile) (dcgm_gpu_utilization)";

/// One series of an instant vector: labels plus `[timestamp, "value"]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromSample {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,
    pub value: (f64, String),
}

impl PromSample {
    /// Node name from the `instance` label, without the port.
    pub fn node_name(&self) -> Option<&str> {
        let instance = self.metric.get("instance")?;
        instance.split(':').next().filter(|n| !n.is_empty())
    }

    /// Sample value; `None` when unparseable or not finite.
    pub fn number(&self) -> Option<f64> {
        self.value.1.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// GPU resource key: `nvidia.com/<mig_profile>` for MIG slices,
    /// `nvidia.com/gpu` otherwise.
    pub fn gpu_resource_key(&self) -> String {
        match self.metric.get("mig_profile").filter(|p| !p.is_empty()) {
            Some(profile) => format!("{}{}", GPU_RESOURCE_PREFIX, profile),
            None => GPU_RESOURCE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryData {
    #[serde(default, rename = "resultType")]
    pub result_type: String,
    #[serde(default)]
    pub result: Vec<PromSample>,
}

/// The `/api/v1/query` response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    pub status: String,
    #[serde(default)]
    pub data: QueryData,
}

impl QueryResponse {
    /// Samples of a successful vector response; anything else yields none.
    /// `query` names the expression in log output.
    pub fn into_samples(self, query: &str) -> Vec<PromSample> {
        if self.status != "success" {
            warn!("Prometheus query `{}` was not successful (status={})", query, self.status);
            return Vec::new();
        }
        if !self.data.result_type.is_empty() && self.data.result_type != "vector" {
            warn!("Expected a vector result for `{}`, got {}", query, self.data.result_type);
            return Vec::new();
        }
        self.data.result
    }
}

#[derive(Default)]
struct GpuTally {
    sum: f64,
    count: u32,
}

/// Build one `NodeMetric` per node seen in any of the three vectors.
///
/// Series for the same node and GPU resource key are averaged. The node's
/// `gpu_usage_percentage` is the mean of its per-key averages, or 0 when it
/// has no GPU series. Samples without an instance or with an unparseable
/// value are skipped. Output is ordered by node name.
pub fn collate(cpu: &[PromSample], memory: &[PromSample], gpu: &[PromSample]) -> Vec<NodeMetric> {
    let mut nodes: BTreeMap<String, NodeMetric> = BTreeMap::new();
    let mut gpu_tallies: BTreeMap<String, BTreeMap<String, GpuTally>> = BTreeMap::new();

    fn entry<'a>(nodes: &'a mut BTreeMap<String, NodeMetric>, name: &str) -> &'a mut NodeMetric {
        nodes.entry(name.to_string()).or_insert_with(|| NodeMetric {
            node: name.to_string(),
            ..Default::default()
        })
    }

    for sample in cpu {
        if let Some((name, value)) = usable(sample) {
            entry(&mut nodes, name).cpu_usage_percentage = Some(value);
        }
    }
    for sample in memory {
        if let Some((name, value)) = usable(sample) {
            entry(&mut nodes, name).memory_usage_percentage = Some(value);
        }
    }
    for sample in gpu {
        if let Some((name, value)) = usable(sample) {
            entry(&mut nodes, name);
            let tally = gpu_tallies
                .entry(name.to_string())
                .or_default()
                .entry(sample.gpu_resource_key())
                .or_default();
            tally.sum += value;
            tally.count += 1;
        }
    }

    for (name, metric) in nodes.iter_mut() {
        if let Some(tallies) = gpu_tallies.remove(name) {
            metric.gpus = tallies
                .into_iter()
                .map(|(key, t)| {
                    let usage_percentage = t.sum / f64::from(t.count);
                    (key, GpuMetric { usage_percentage })
                })
                .collect();
        }
        let overall = if metric.gpus.is_empty() {
            0.0
        } else {
            metric.gpus.values().map(|g| g.usage_percentage).sum::<f64>() / metric.gpus.len() as f64
        };
        metric.gpu_usage_percentage = Some(overall);
    }

    debug!("Collated metrics for {} nodes", nodes.len());
    nodes.into_values().collect()
}

fn usable(sample: &PromSample) -> Option<(&str, f64)> {
    let Some(name) = sample.node_name() else {
        debug!("Skipping sample without instance label");
        return None;
    };
    let Some(value) = sample.number() else {
        debug!("Skipping unparseable sample for {}: {}", name, sample.value.1);
        return None;
    };
    Some((name, value))
}

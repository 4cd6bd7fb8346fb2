use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- Resource requirements ---

/// Per-container resource maps. Values are Kubernetes quantity strings,
/// keyed by resource name (`cpu`, `memory`, `nvidia.com/gpu`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default)]
    pub limits: BTreeMap<String, String>,
    #[serde(default)]
    pub requests: BTreeMap<String, String>,
}

// --- Container spec ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub name: String,
    #[serde(default)]
    pub resources: ResourceRequirements,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
}

// --- Pod ---

/// A pod as reported by the pod-listing source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    pub name: String,
    pub namespace: String,
    /// The node this pod is assigned to; `None` while pending.
    #[serde(default)]
    pub node_name: Option<String>,
    #[serde(default)]
    pub spec: PodSpec,
}

/// GPU consumption attributed to one pod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodGpuUsage {
    pub namespace: String,
    pub name: String,
    /// Sum of GPU-family limits across all containers. Always > 0.
    pub gpu_count: f64,
}

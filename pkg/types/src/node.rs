use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pod::PodGpuUsage;

// --- Resource figures ---

/// Capacity/allocatable/usage for one resource on one node.
///
/// The three figures are opaque display strings exactly as the inventory
/// source reported them. `usage_percentage` is only set once a metric record
/// for the node has been merged in; `None` means "no data", not "idle".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStat {
    #[serde(default)]
    pub capacity: String,
    #[serde(default)]
    pub allocatable: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_percentage: Option<f64>,
}

impl ResourceStat {
    pub fn new(capacity: &str, allocatable: &str, usage: &str) -> Self {
        Self {
            capacity: capacity.to_string(),
            allocatable: allocatable.to_string(),
            usage: usage.to_string(),
            usage_percentage: None,
        }
    }
}

/// One GPU resource (a MIG profile or a whole GPU) on a node.
pub type GpuProfile = ResourceStat;

// --- Inventory ---

/// A node as reported by the cluster inventory source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInventory {
    pub name: String,
    /// If true, the node is cordoned and takes no new pods.
    #[serde(default)]
    pub unschedulable: bool,
    #[serde(default)]
    pub cpu: ResourceStat,
    #[serde(default)]
    pub memory: ResourceStat,
    /// GPU resources keyed by resource name, e.g. `nvidia.com/mig-1g.5gb`.
    #[serde(default)]
    pub gpus: BTreeMap<String, GpuProfile>,
}

// --- Metrics ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuMetric {
    pub usage_percentage: f64,
}

/// Usage percentages for one node as reported by the metrics source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetric {
    /// Node name; joined against `NodeInventory::name` by exact match.
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage_percentage: Option<f64>,
    /// Mean utilization across the node's GPU resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_usage_percentage: Option<f64>,
    #[serde(default)]
    pub gpus: BTreeMap<String, GpuMetric>,
}

// --- Unified view ---

/// Inventory and metrics for one node, merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub name: String,
    pub unschedulable: bool,
    pub cpu: ResourceStat,
    pub memory: ResourceStat,
    pub gpus: BTreeMap<String, GpuProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_usage_percentage: Option<f64>,
    /// GPU workloads on this node. Filled by the live node pipeline only.
    #[serde(default)]
    pub pods: Vec<PodGpuUsage>,
}

impl NodeView {
    pub fn cpu_usage_percentage(&self) -> Option<f64> {
        self.cpu.usage_percentage
    }

    pub fn memory_usage_percentage(&self) -> Option<f64> {
        self.memory.usage_percentage
    }
}

//! Fixed placeholder node set, served when the live node pipeline fails.
//!
//! The figures are constant so that a degraded response is reproducible;
//! nothing here is randomized.

use pkg_types::node::{GpuMetric, GpuProfile, NodeInventory, NodeMetric, ResourceStat};
use std::collections::BTreeMap;

fn gpus(entries: &[(&str, &str, &str, &str)]) -> BTreeMap<String, GpuProfile> {
    entries
        .iter()
        .map(|(key, capacity, allocatable, usage)| {
            (key.to_string(), GpuProfile::new(capacity, allocatable, usage))
        })
        .collect()
}

fn gpu_usage(entries: &[(&str, f64)]) -> BTreeMap<String, GpuMetric> {
    entries
        .iter()
        .map(|(key, pct)| {
            (
                key.to_string(),
                GpuMetric {
                    usage_percentage: *pct,
                },
            )
        })
        .collect()
}

pub fn baseline_inventory() -> Vec<NodeInventory> {
    vec![
        NodeInventory {
            name: "mig-node-1".to_string(),
            unschedulable: false,
            cpu: ResourceStat::new("32", "31500m", "14"),
            memory: ResourceStat::new("256Gi", "250Gi", "150Gi"),
            gpus: gpus(&[
                ("nvidia.com/mig-1g.5gb", "7", "7", "6"),
                ("nvidia.com/mig-2g.10gb", "3", "3", "2"),
            ]),
        },
        NodeInventory {
            name: "mig-node-2".to_string(),
            unschedulable: false,
            cpu: ResourceStat::new("32", "31500m", "25"),
            memory: ResourceStat::new("256Gi", "250Gi", "190Gi"),
            gpus: gpus(&[("nvidia.com/mig-3g.20gb", "2", "2", "2")]),
        },
        NodeInventory {
            name: "non-mig-gpu-node".to_string(),
            unschedulable: false,
            cpu: ResourceStat::new("16", "15800m", "11"),
            memory: ResourceStat::new("128Gi", "126Gi", "100Gi"),
            gpus: gpus(&[("nvidia.com/gpu", "4", "4", "2")]),
        },
        NodeInventory {
            name: "no-gpu-node".to_string(),
            unschedulable: true,
            cpu: ResourceStat::new("8", "7800m", "1200m"),
            memory: ResourceStat::new("32Gi", "31Gi", "9Gi"),
            gpus: BTreeMap::new(),
        },
    ]
}

pub fn baseline_metrics() -> Vec<NodeMetric> {
    vec![
        NodeMetric {
            node: "mig-node-1".to_string(),
            cpu_usage_percentage: Some(45.5),
            memory_usage_percentage: Some(60.1),
            gpu_usage_percentage: Some(77.5),
            gpus: gpu_usage(&[
                ("nvidia.com/mig-1g.5gb", 90.0),
                ("nvidia.com/mig-2g.10gb", 65.0),
            ]),
        },
        NodeMetric {
            node: "mig-node-2".to_string(),
            cpu_usage_percentage: Some(80.2),
            memory_usage_percentage: Some(75.8),
            gpu_usage_percentage: Some(95.0),
            gpus: gpu_usage(&[("nvidia.com/mig-3g.20gb", 95.0)]),
        },
        NodeMetric {
            node: "non-mig-gpu-node".to_string(),
            cpu_usage_percentage: Some(70.0),
            memory_usage_percentage: Some(80.0),
            gpu_usage_percentage: Some(50.0),
            gpus: gpu_usage(&[("nvidia.com/gpu", 50.0)]),
        },
        NodeMetric {
            node: "no-gpu-node".to_string(),
            cpu_usage_percentage: Some(15.0),
            memory_usage_percentage: Some(30.5),
            gpu_usage_percentage: Some(0.0),
            gpus: BTreeMap::new(),
        },
    ]
}

use pkg_constants::resources::UNKNOWN_MARKER;
use pkg_types::node::{GpuMetric, GpuProfile, NodeInventory, NodeMetric, NodeView};
use std::collections::BTreeMap;
use tracing::debug;

/// Join node inventory with usage metrics by node name.
///
/// Each inventory record takes the first metric whose `node` equals its
/// `name` exactly; later duplicates are ignored. Nodes without a metric keep
/// every percentage as `None`. Output order follows `nodes`.
pub fn reconcile(nodes: &[NodeInventory], metrics: &[NodeMetric]) -> Vec<NodeView> {
    nodes
        .iter()
        .map(|node| {
            let metric = metrics.iter().find(|m| m.node == node.name);
            if metric.is_none() {
                debug!("No metrics for node {}", node.name);
            }
            merge_node(node, metric)
        })
        .collect()
}

fn merge_node(node: &NodeInventory, metric: Option<&NodeMetric>) -> NodeView {
    let mut view = NodeView {
        name: node.name.clone(),
        unschedulable: node.unschedulable,
        cpu: node.cpu.clone(),
        memory: node.memory.clone(),
        gpus: node.gpus.clone(),
        gpu_usage_percentage: None,
        pods: Vec::new(),
    };

    if let Some(metric) = metric {
        view.cpu.usage_percentage = metric.cpu_usage_percentage;
        view.memory.usage_percentage = metric.memory_usage_percentage;
        view.gpu_usage_percentage = metric.gpu_usage_percentage;
        merge_gpus(&mut view.gpus, &metric.gpus);
    }
    view
}

/// Union metric GPU usage into the inventory GPU map.
///
/// A key known to inventory gets its `usage_percentage` set. A key only the
/// metrics source reports gets a new entry whose capacity, allocatable, and
/// usage are [`UNKNOWN_MARKER`], so its usage is still shown.
pub fn merge_gpus(gpus: &mut BTreeMap<String, GpuProfile>, reported: &BTreeMap<String, GpuMetric>) {
    for (key, usage) in reported {
        match gpus.get_mut(key) {
            Some(profile) => profile.usage_percentage = Some(usage.usage_percentage),
            None => {
                debug!("GPU resource {} reported by metrics only", key);
                let mut profile = GpuProfile::new(UNKNOWN_MARKER, UNKNOWN_MARKER, UNKNOWN_MARKER);
                profile.usage_percentage = Some(usage.usage_percentage);
                gpus.insert(key.clone(), profile);
            }
        }
    }
}

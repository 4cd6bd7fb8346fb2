//! The three operations the HTTP surface exposes, independent of axum.

use futures_util::future::join_all;
use pkg_quota::collect_namespace_quotas;
use pkg_quota::pods::attribute_gpu_pods;
use pkg_reconciler::reconcile;
use pkg_sources::baseline::{baseline_inventory, baseline_metrics};
use pkg_sources::{ClusterSources, PodSource, QuotaSource};
use pkg_types::node::NodeView;
use pkg_types::pod::{Pod, PodGpuUsage};
use pkg_types::quota::NamespaceQuota;
use tracing::{info, warn};

/// Node views for a cluster, and whether they came from the baseline.
#[derive(Debug, Clone)]
pub struct NodeViewReport {
    pub nodes: Vec<NodeView>,
    pub baseline: bool,
}

/// Fetch inventory, metrics, and pods concurrently and merge them.
///
/// If inventory or metrics cannot be fetched the whole view degrades to the
/// fixed baseline. A failed pod listing only leaves `pods` empty.
pub async fn get_node_view(sources: &ClusterSources) -> NodeViewReport {
    let (nodes, metrics, pods) = tokio::join!(
        sources.inventory.list_nodes(),
        sources.metrics.node_metrics(),
        sources.pods.list_pods(),
    );

    let (nodes, metrics) = match (nodes, metrics) {
        (Ok(nodes), Ok(metrics)) => (nodes, metrics),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Node pipeline failed, serving baseline: {:#}", e);
            return NodeViewReport {
                nodes: reconcile(&baseline_inventory(), &baseline_metrics()),
                baseline: true,
            };
        }
    };

    let mut views = reconcile(&nodes, &metrics);
    match pods {
        Ok(pods) => attach_pods(&mut views, &pods),
        Err(e) => warn!("Pod listing failed, node views carry no pods: {:#}", e),
    }
    info!("Reconciled {} nodes against {} metric records", views.len(), metrics.len());
    NodeViewReport {
        nodes: views,
        baseline: false,
    }
}

/// Fill each view's `pods` with the GPU workloads attributed to it.
fn attach_pods(views: &mut [NodeView], pods: &[Pod]) {
    for view in views.iter_mut() {
        view.pods = attribute_gpu_pods(pods, &view.name);
    }
}

/// Aggregate quotas for every namespace the source lists.
///
/// Per-namespace listings run concurrently; a failing namespace is dropped.
/// Only a failure to list namespaces at all is returned as an error.
pub async fn get_namespace_quotas(quotas: &dyn QuotaSource) -> anyhow::Result<Vec<NamespaceQuota>> {
    let mut namespaces = quotas.list_namespaces().await?;
    namespaces.sort();
    namespaces.dedup();
    let listings = join_all(namespaces.iter().map(|ns| quotas.list_quotas(ns))).await;
    let summaries = collect_namespace_quotas(namespaces.into_iter().zip(listings).collect());
    info!("Aggregated quotas for {} namespaces", summaries.len());
    Ok(summaries)
}

/// GPU workloads running on `node_name`.
pub async fn get_gpu_pod_attribution(
    pods: &dyn PodSource,
    node_name: &str,
) -> anyhow::Result<Vec<PodGpuUsage>> {
    let pods = pods.list_pods().await?;
    Ok(attribute_gpu_pods(&pods, node_name))
}

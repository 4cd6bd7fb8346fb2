use axum::{
    Json,
    extract::{Path as AxumPath, State},
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
};
use pkg_types::validate::validate_node_name;
use tracing::{error, info};

use super::{error_response, resolve_cluster};
use crate::AppState;
use crate::service::{get_gpu_pod_attribution, get_node_view};

/// Set to `true` on node responses served from the baseline.
pub const BASELINE_HEADER: &str = "x-kheat-baseline";

/// GET /api/v1/clusters/{cluster}/nodes: merged per-node view.
pub async fn list_nodes(
    State(state): State<AppState>,
    AxumPath(cluster): AxumPath<String>,
) -> impl IntoResponse {
    info!("Serving node view request for cluster {}", cluster);
    let sources = match resolve_cluster(&state, &cluster) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let report = get_node_view(&sources).await;
    let mut resp = (StatusCode::OK, Json(report.nodes)).into_response();
    let flag = if report.baseline { "true" } else { "false" };
    resp.headers_mut()
        .insert(BASELINE_HEADER, HeaderValue::from_static(flag));
    resp
}

/// GET /api/v1/clusters/{cluster}/nodes/{node}/pods: GPU pods on a node.
pub async fn node_pods(
    State(state): State<AppState>,
    AxumPath((cluster, node)): AxumPath<(String, String)>,
) -> impl IntoResponse {
    info!("Serving GPU pod request for {}/{}", cluster, node);
    let sources = match resolve_cluster(&state, &cluster) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    if let Err(e) = validate_node_name(&node) {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    match get_gpu_pod_attribution(sources.pods.as_ref(), &node).await {
        Ok(pods) => (StatusCode::OK, Json(pods)).into_response(),
        Err(e) => {
            error!("Pod source for cluster {} failed: {:#}", cluster, e);
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("pod data for cluster '{}' is unavailable", cluster),
            )
        }
    }
}

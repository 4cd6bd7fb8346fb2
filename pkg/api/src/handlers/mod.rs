pub mod clusters;
pub mod nodes;
pub mod quotas;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pkg_sources::ClusterSources;
use pkg_types::validate::validate_cluster_id;
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// `{"error": ...}` body with the given status.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Resolve a cluster path parameter to its sources, or the error response
/// to send instead.
pub(crate) fn resolve_cluster(state: &AppState, cluster: &str) -> Result<ClusterSources, Response> {
    if let Err(e) = validate_cluster_id(cluster) {
        warn!("Rejected cluster id: {}", e);
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }
    if state.cluster(cluster).is_none() {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            format!("cluster '{}' is not configured", cluster),
        ));
    }
    Ok(state.provider.sources(cluster))
}

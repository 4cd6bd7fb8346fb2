use axum::{
    Json,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};

use super::{error_response, resolve_cluster};
use crate::AppState;
use crate::service::get_namespace_quotas;

/// GET /api/v1/clusters/{cluster}/quotas: per-namespace quota summaries.
///
/// If the namespace list itself cannot be fetched the response is 503; no
/// placeholder figures are substituted.
pub async fn list_quotas(
    State(state): State<AppState>,
    AxumPath(cluster): AxumPath<String>,
) -> impl IntoResponse {
    info!("Serving quota request for cluster {}", cluster);
    let sources = match resolve_cluster(&state, &cluster) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    match get_namespace_quotas(sources.quotas.as_ref()).await {
        Ok(quotas) => (StatusCode::OK, Json(quotas)).into_response(),
        Err(e) => {
            error!("Quota source for cluster {} failed: {:#}", cluster, e);
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("quota data for cluster '{}' is unavailable", cluster),
            )
        }
    }
}

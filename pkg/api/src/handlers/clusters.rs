use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use crate::AppState;

/// GET /api/v1/clusters: list configured clusters.
pub async fn list_clusters(State(state): State<AppState>) -> impl IntoResponse {
    info!("Serving cluster list request");
    (StatusCode::OK, Json(state.clusters.as_ref().clone())).into_response()
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

//! Deploy and health handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::http::errors::ApiError;
use crate::state::ApiState;

/// Body of a deploy request.
#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    /// URL of the repository to clone and upload.
    pub repo_url: String,
}

/// Body of a successful deploy response.
#[derive(Debug, Serialize)]
pub struct DeployResponse {
    /// Identifier of the new deployment.
    pub id: String,
    /// Files uploaded successfully.
    pub uploaded: usize,
    /// Files that failed to upload.
    pub failed: usize,
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) objects_uploaded_total: u64,
    pub(crate) objects_downloaded_total: u64,
}

/// Clone the requested repository and upload its tree to object storage.
///
/// Responds only after the upload batch settles, so the reported counts are
/// final for this deployment.
pub(crate) async fn deploy(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<DeployRequest>,
) -> Result<Json<DeployResponse>, ApiError> {
    let report = match state.sync.deploy_repository(&request.repo_url, &state.workdir).await {
        Ok(report) => report,
        Err(error) => {
            warn!(url = %request.repo_url, error = %error, "deployment failed");
            let api_error = ApiError::from(error);
            state
                .telemetry
                .inc_http_request("/deploy", api_error.status().as_u16());
            return Err(api_error);
        }
    };

    let uploaded = report.batch.succeeded;
    let failed = report.batch.failures.len();
    state.telemetry.inc_http_request("/deploy", 200);
    info!(id = %report.id, uploaded, failed, "deployment settled");

    Ok(Json(DeployResponse {
        id: report.id.to_string(),
        uploaded,
        failed,
    }))
}

/// Liveness probe with transfer counters.
pub(crate) async fn healthz(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let snapshot = state.telemetry.snapshot();
    Json(HealthResponse {
        status: "ok",
        objects_uploaded_total: snapshot.objects_uploaded_total,
        objects_downloaded_total: snapshot.objects_downloaded_total,
    })
}

/// Prometheus text exposition of the metrics registry.
pub(crate) async fn metrics(
    State(state): State<Arc<ApiState>>,
) -> Result<(StatusCode, String), ApiError> {
    state
        .telemetry
        .render()
        .map(|body| (StatusCode::OK, body))
        .map_err(|error| ApiError::internal(error.to_string()))
}

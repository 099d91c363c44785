use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::JobRunnerError;
use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::error_response::error_response;

pub const WORKER_SECRET_HEADER: &str = "x-worker-secret";

#[derive(Debug, Deserialize)]
pub struct ProcessJobRequest {
    pub job_id: String,
}

#[derive(Serialize)]
pub struct ProcessJobResponse {
    pub ok: bool,
    pub job_id: String,
    pub processed: usize,
    pub done: usize,
    pub error: usize,
}

/// Runs every pending item of a job synchronously.
#[tracing::instrument(skip(state, headers, request), fields(job_id = %request.job_id))]
pub async fn process_job_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ProcessJobRequest>,
) -> impl IntoResponse {
    if let Some(expected) = state.worker_secret.as_deref() {
        let provided = headers
            .get(WORKER_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected) {
            tracing::warn!("Rejected process-job call with a bad worker secret");
            return error_response(StatusCode::UNAUTHORIZED, "invalid worker secret");
        }
    }

    let uuid = match Uuid::parse_str(&request.job_id) {
        Ok(u) => u,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid job ID: {}", request.job_id),
            );
        }
    };

    match state.job_runner.run_job(JobId::from_uuid(uuid)).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(ProcessJobResponse {
                ok: true,
                job_id: request.job_id,
                processed: summary.processed,
                done: summary.done,
                error: summary.error,
            }),
        )
            .into_response(),
        Err(e @ JobRunnerError::JobNotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Job run failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

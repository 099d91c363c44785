use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{JobId, JobItem};
use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Serialize)]
pub struct JobItemResponse {
    pub id: String,
    pub file_name: String,
    pub status: String,
    pub duration_ms: Option<i64>,
    pub result_path: Option<String>,
    pub error_message: Option<String>,
}

impl From<JobItem> for JobItemResponse {
    fn from(item: JobItem) -> Self {
        Self {
            id: item.id.as_uuid().to_string(),
            file_name: item.file_name,
            status: item.status.as_str().to_string(),
            duration_ms: item.duration_ms,
            result_path: item.result_path,
            error_message: item.error_message,
        }
    }
}

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub id: String,
    pub status: String,
    pub total_count: i64,
    pub done_count: i64,
    pub error_count: i64,
    pub created_at: String,
    pub updated_at: String,
    pub items: Vec<JobItemResponse>,
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid job ID: {}", job_id));
        }
    };
    let id = JobId::from_uuid(uuid);
    let repository = state.job_repository();

    let job = match repository.get_job(id).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return error_response(StatusCode::NOT_FOUND, format!("Job not found: {}", job_id));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job status");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch job: {}", e),
            );
        }
    };

    let items = match repository.items_for_job(id).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job items");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch job items: {}", e),
            );
        }
    };

    let response = JobStatusResponse {
        id: job.id.as_uuid().to_string(),
        status: job.status.as_str().to_string(),
        total_count: job.total_count,
        done_count: job.done_count,
        error_count: job.error_count,
        created_at: job.created_at.to_rfc3339(),
        updated_at: job.updated_at.to_rfc3339(),
        items: items.into_iter().map(JobItemResponse::from).collect(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

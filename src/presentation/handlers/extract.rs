use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::Schema;
use crate::presentation::state::AppState;

use super::error_response::error_response;

/// Either `pages` (same shapes the token files accept) or a single page of
/// `tokens`, plus the schema whose keys should be filled.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub pages: Option<Value>,
    #[serde(default)]
    pub tokens: Option<Value>,
    #[serde(default, alias = "extraction_schema")]
    pub schema: Value,
}

#[tracing::instrument(skip_all)]
pub async fn extract_handler(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> impl IntoResponse {
    let schema = Schema::parse(&request.schema);
    if schema.is_empty() {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, "schema_missing");
    }

    let document = match (request.pages, request.tokens) {
        (Some(pages), _) => pages,
        (None, Some(tokens)) => json!([tokens]),
        (None, None) => {
            return error_response(StatusCode::BAD_REQUEST, "either pages or tokens is required");
        }
    };

    let raw = match serde_json::to_vec(&document) {
        Ok(raw) => raw,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let pages = match state.word_extractor.extract_pages(&raw) {
        Ok(pages) => pages,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected token payload");
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    };

    let extraction = state.extractor.extract(&pages, &schema).await;
    (StatusCode::OK, Json(extraction)).into_response()
}

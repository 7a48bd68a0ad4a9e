use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::presentation::state::AppState;

use super::{JobStatusResponse, error_response};

#[derive(Debug, Serialize)]
pub struct ClientJobsResponse {
    pub client_id: String,
    pub jobs: Vec<JobStatusResponse>,
}

/// Newest first.
#[tracing::instrument(skip(state))]
pub async fn client_jobs_handler(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Response {
    match state.job_service.list_for_client(&client_id).await {
        Ok(mut jobs) => {
            jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let jobs = jobs.into_iter().map(JobStatusResponse::from).collect();
            (StatusCode::OK, Json(ClientJobsResponse { client_id, jobs })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list client jobs");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Failed to list jobs",
            )
        }
    }
}

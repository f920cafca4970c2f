use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    pub transcribed_text: Option<String>,
    pub summarized_text: Option<String>,
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let Ok(id) = job_id.parse::<JobId>() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid job ID: {}", job_id),
        );
    };

    match state.job_repository.get_by_id(id).await {
        Ok(Some(job)) => {
            let response = JobStatusResponse {
                job_id: job.id.to_string(),
                status: job.status.as_str().to_string(),
                transcribed_text: job.transcribed_text,
                summarized_text: job.summarized_text,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("Job not found: {}", job_id),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job status");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch job: {}", e),
            )
        }
    }
}

use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::application::services::{SubmitError, UploadedMedia};
use crate::domain::{MediaKind, SiteDestination};
use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Serialize)]
pub struct TranscriptionAcceptedResponse {
    pub job_id: String,
    pub message: String,
}

async fn write_upload(field: &mut Field<'_>, upload: &UploadedMedia) -> Result<u64, String> {
    let mut file = tokio::fs::File::create(upload.path())
        .await
        .map_err(|e| format!("Failed to create upload file: {}", e))?;
    let mut total_bytes: u64 = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| format!("Failed to read file: {}", e))?
    {
        total_bytes += chunk.len() as u64;
        file.write_all(&chunk)
            .await
            .map_err(|e| format!("Failed to write upload file: {}", e))?;
    }

    file.flush()
        .await
        .map_err(|e| format!("Failed to write upload file: {}", e))?;

    Ok(total_bytes)
}

#[tracing::instrument(skip(state, multipart))]
pub async fn submit_transcription_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut upload: Option<UploadedMedia> = None;
    let mut site: Option<String> = None;
    let mut directory: Option<String> = None;

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                );
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if MediaKind::from_path(std::path::Path::new(&filename)).is_none() {
                    tracing::warn!(filename = %filename, "Unsupported media format");
                    return error_response(
                        StatusCode::UNSUPPORTED_MEDIA_TYPE,
                        format!(
                            "Unsupported file format: {}. Supported: wav, mp4, m4a, mp3",
                            filename
                        ),
                    );
                }

                let media = match UploadedMedia::create(&filename) {
                    Ok(media) => media,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to create upload directory");
                        return error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "Failed to store upload",
                        );
                    }
                };

                match write_upload(&mut field, &media).await {
                    Ok(0) => {
                        return error_response(StatusCode::BAD_REQUEST, "Uploaded file is empty");
                    }
                    Ok(bytes) => {
                        tracing::debug!(filename = %filename, bytes, "File upload received");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to receive upload");
                        return error_response(StatusCode::BAD_REQUEST, e);
                    }
                }
                upload = Some(media);
            }
            "site" | "directory" => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(
                            field = %name,
                            error = %e,
                            "Failed to read multipart text field"
                        );
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read field {}: {}", name, e),
                        );
                    }
                };
                if name == "site" {
                    site = Some(value);
                } else {
                    directory = Some(value);
                }
            }
            other => tracing::debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let Some(upload) = upload else {
        tracing::warn!("Transcription request with no file");
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };

    let partial = site.as_deref().is_some_and(|s| !s.trim().is_empty())
        != directory.as_deref().is_some_and(|d| !d.trim().is_empty());
    if partial {
        tracing::warn!("Both site and directory are required for delivery; ignoring destination");
    }
    let destination = SiteDestination::from_parts(site, directory);

    let filename = upload.file_name().to_string();
    match state.job_submitter.submit(upload, destination).await {
        Ok(job_id) => {
            tracing::info!(job_id = %job_id, filename = %filename, "Transcription job accepted");
            (
                StatusCode::ACCEPTED,
                Json(TranscriptionAcceptedResponse {
                    job_id: job_id.to_string(),
                    message: "Transcription started".to_string(),
                }),
            )
                .into_response()
        }
        Err(SubmitError::WorkerUnavailable) => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Transcription queue full or worker unavailable",
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create transcription job");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create job: {}", e),
            )
        }
    }
}

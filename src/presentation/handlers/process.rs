use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::StreamExt;
use futures::stream;
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::SubmitError;
use crate::domain::{InputKind, JobInput, StagedFile, StoragePath};
use crate::presentation::state::AppState;

use super::error_response;

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

struct UploadedFile {
    filename: String,
    data: Bytes,
}

#[derive(Default)]
struct ProcessForm {
    input_type: Option<String>,
    user_id: Option<String>,
    content: Option<String>,
    file: Option<UploadedFile>,
}

async fn read_form(multipart: &mut Multipart) -> Result<ProcessForm, String> {
    let mut form = ProcessForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "type" => form.input_type = Some(text_field(field).await?),
            "user_id" => form.user_id = Some(text_field(field).await?),
            "content" => form.content = Some(text_field(field).await?),
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(|e| e.to_string())?;
                form.file = Some(UploadedFile { filename, data });
            }
            other => tracing::debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    Ok(form)
}

async fn text_field(field: Field<'_>) -> Result<String, String> {
    field
        .text()
        .await
        .map(|s| s.trim().to_string())
        .map_err(|e| e.to_string())
}

fn validation_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, "validation_error", message)
}

#[tracing::instrument(skip(state, multipart))]
pub async fn process_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse multipart form");
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "Failed to parse multipart form",
            );
        }
    };

    let (input_type, user_id) = match (form.input_type, form.user_id) {
        (Some(t), Some(u)) if !t.is_empty() && !u.is_empty() => (t, u),
        _ => return validation_error("type and user_id are required"),
    };

    let kind: InputKind = match input_type.parse() {
        Ok(kind) => kind,
        Err(_) => return validation_error("type must be one of: text, image, document"),
    };

    let input = match kind {
        InputKind::Text => match form.content {
            Some(content) if !content.is_empty() => JobInput::Text(content),
            _ => return validation_error("content is required for type 'text'"),
        },
        InputKind::Image | InputKind::Document => {
            let Some(file) = form.file else {
                return validation_error("file is required for type 'image' or 'document'");
            };
            if let Err(message) = validate_file(&file, kind, state.max_file_size_bytes) {
                return validation_error(message);
            }
            match stage_file(&state, file, kind).await {
                Ok(staged) => JobInput::File(staged),
                Err(response) => return response,
            }
        }
    };

    let staged = match &input {
        JobInput::File(file) => Some(file.path.clone()),
        JobInput::Text(_) => None,
    };

    match state.job_service.submit(user_id.clone(), input).await {
        Ok(job_id) => {
            tracing::info!(job_id = %job_id, user_id = %user_id, kind = %kind, "Job accepted");
            (
                StatusCode::ACCEPTED,
                Json(ProcessResponse {
                    job_id: job_id.to_string(),
                    status: "accepted".to_string(),
                    message: "Processing request".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to submit job");
            if let Some(path) = staged {
                if let Err(e) = state.staging_store.delete(&path).await {
                    tracing::warn!(path = %path, error = %e, "Failed to remove staged file");
                }
            }
            match e {
                SubmitError::QueueFull | SubmitError::WorkerUnavailable => error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "Processing capacity exhausted, retry later",
                ),
                SubmitError::Repository(_) => error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Failed to submit job for processing",
                ),
            }
        }
    }
}

fn validate_file(file: &UploadedFile, kind: InputKind, max_bytes: u64) -> Result<(), String> {
    if file.data.len() as u64 > max_bytes {
        return Err(format!(
            "file size exceeds {}MB limit",
            max_bytes / (1024 * 1024)
        ));
    }
    if !kind.accepts_filename(&file.filename) {
        return Err(format!(
            "invalid {} format. Supported: {}",
            kind,
            kind.allowed_extensions().join(", ")
        ));
    }
    Ok(())
}

async fn stage_file(
    state: &AppState,
    file: UploadedFile,
    kind: InputKind,
) -> Result<StagedFile, Response> {
    let UploadedFile { filename, data } = file;
    let path = StoragePath::new(Uuid::new_v4(), &filename);
    let body = stream::once(async move { Ok::<_, std::io::Error>(data) }).boxed();

    match state.staging_store.store(&path, body).await {
        Ok(size) => {
            tracing::debug!(path = %path, bytes = size, "Upload staged");
            Ok(StagedFile::new(path, filename, kind, size))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save uploaded file");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Failed to save uploaded file",
            ))
        }
    }
}

use std::io;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::{StreamExt, TryStreamExt};

use crate::application::ports::FileLoader;
use crate::domain::StoragePath;
use crate::presentation::handlers::responses::MessageResponse;
use crate::presentation::state::AppState;

pub const UPLOAD_FIELD: &str = "pdfFile";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "PDF file processed successfully.";
pub const UPLOAD_MISSING_MESSAGE: &str = "No PDF file found";

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageResponse {
            message: message.into(),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler<F>(
    State(state): State<AppState<F>>,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    F: FileLoader + 'static,
{
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return message(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                );
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let path = match StoragePath::for_upload(&filename) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(filename = %filename, "Rejected upload file name");
                return message(StatusCode::BAD_REQUEST, e.to_string());
            }
        };

        let stream = field.map_err(io::Error::other).boxed();

        return match state.staging_store.store(&path, stream, None).await {
            Ok(bytes) => {
                tracing::info!(path = %path, bytes, "PDF upload stored");
                message(StatusCode::OK, UPLOAD_SUCCESS_MESSAGE)
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path, "Failed to store upload");
                message(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to store file: {}", e),
                )
            }
        };
    }

    tracing::warn!("Upload request with no {} field", UPLOAD_FIELD);
    message(StatusCode::BAD_REQUEST, UPLOAD_MISSING_MESSAGE)
}

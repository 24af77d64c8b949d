use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::application::ports::FileLoader;
use crate::domain::FileId;
use crate::presentation::handlers::responses::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadAndExtractRequest {
    pub file_id: Option<String>,
}

#[tracing::instrument(skip(state, body))]
pub async fn download_and_extract_handler<F>(
    State(state): State<AppState<F>>,
    body: Result<Json<DownloadAndExtractRequest>, JsonRejection>,
) -> impl IntoResponse
where
    F: FileLoader + 'static,
{
    let raw_id = match &body {
        Ok(Json(request)) => request.file_id.as_deref(),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Malformed extraction request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: rejection.body_text(),
                }),
            )
                .into_response();
        }
    };

    let file_id = match FileId::parse(raw_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Extraction request without file id");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.extraction_service.download_and_extract(&file_id).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, file_id = %file_id, "Download and extraction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::application::ports::FileLoader;
use crate::domain::FolderId;
use crate::presentation::handlers::responses::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListFilesParams {
    pub folder_id: Option<String>,
}

#[tracing::instrument(skip(state))]
pub async fn list_files_handler<F>(
    State(state): State<AppState<F>>,
    Query(params): Query<ListFilesParams>,
) -> impl IntoResponse
where
    F: FileLoader + 'static,
{
    let folder_id = match FolderId::parse(params.folder_id.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "List request without folder id");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.storage_provider.list_files(&folder_id).await {
        Ok(files) => (StatusCode::OK, Json(files)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, folder_id = %folder_id, "Failed to list folder");
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

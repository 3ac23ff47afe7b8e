//! File upload and download handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde::Deserialize;

use super::AppState;
use crate::web::JsonResponse;
use crate::ToolkitError;

/// Query parameters for downloads.
#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    /// Name the client should save the file as. Defaults to the stored name.
    #[serde(rename = "as")]
    pub display_name: Option<String>,
}

/// POST /api/upload - Store every file of a multipart request.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ToolkitError> {
    let files = state
        .toolkit
        .upload_files(request, &state.upload_dir, true)
        .await?;

    let envelope = JsonResponse::with_data(format!("Uploaded {} file(s)", files.len()), &files)?;
    state
        .toolkit
        .write_json(StatusCode::OK, &envelope, HeaderMap::new())
}

/// POST /api/upload-one - Store the single file of a multipart request.
pub async fn upload_one_file(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ToolkitError> {
    let file = state
        .toolkit
        .upload_one_file(request, &state.upload_dir, true)
        .await?;

    let envelope = JsonResponse::with_data(
        format!("Uploaded {}", file.original_file_name),
        &file,
    )?;
    state
        .toolkit
        .write_json(StatusCode::OK, &envelope, HeaderMap::new())
}

/// GET /api/download/:name - Download a stored file as an attachment.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<DownloadQuery>,
    request: Request,
) -> Result<Response, ToolkitError> {
    let display_name = query.display_name.as_deref().unwrap_or(&name);

    state
        .toolkit
        .download_static_file(request, &state.download_dir, &name, display_name)
        .await
}

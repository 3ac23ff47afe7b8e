//! Slug handler.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::web::extract::StrictJson;
use crate::web::JsonResponse;
use crate::ToolkitError;

/// Slug request.
#[derive(Debug, Deserialize)]
pub struct SlugRequest {
    /// Free text to turn into a slug.
    pub text: String,
}

/// Slug response data.
#[derive(Debug, Serialize)]
pub struct SlugResponse {
    pub slug: String,
}

/// POST /api/slug - Slugify free text.
pub async fn create_slug(
    State(state): State<Arc<AppState>>,
    StrictJson(req): StrictJson<SlugRequest>,
) -> Result<Response, ToolkitError> {
    let slug = state.toolkit.slugify(&req.text)?;

    let envelope = JsonResponse::with_data("Slug created", SlugResponse { slug })?;
    state
        .toolkit
        .write_json(StatusCode::OK, &envelope, HeaderMap::new())
}

//! HTTP rendering of toolkit errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::json::error_json;
use crate::error::ErrorKind;
use crate::ToolkitError;

impl ToolkitError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match (self.kind(), self) {
            (_, ToolkitError::UnsupportedFileType { .. }) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            (_, ToolkitError::NotFound(_)) => StatusCode::NOT_FOUND,
            (ErrorKind::Validation | ErrorKind::Protocol, _) => StatusCode::BAD_REQUEST,
            (ErrorKind::Capacity, _) => StatusCode::PAYLOAD_TOO_LARGE,
            (ErrorKind::Configuration | ErrorKind::Io | ErrorKind::Encoding, _) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ToolkitError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!("Internal error: {}", self);
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        match error_json(message, Some(status)) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Failed to render error response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

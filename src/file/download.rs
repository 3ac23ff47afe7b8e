//! Forced-download responses for stored files.

use std::io;
use std::path::Path;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::storage::check_file_name;
use crate::{Result, ToolkitError};

/// Generate a safe Content-Disposition header value for file downloads.
///
/// - Removes control characters (including CR, LF which could cause header injection)
/// - Replaces double quotes, backslashes and non-ASCII characters in the fallback name
/// - Uses RFC 5987 filename* parameter for proper Unicode support
pub fn content_disposition_header(filename: &str) -> String {
    let filename: String = filename.chars().filter(|c| !c.is_control()).collect();

    if filename.is_ascii() && !filename.contains(['"', '\\']) {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            c => c,
        })
        .collect();
    let encoded = urlencoding::encode(&filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}

/// Stream `source_dir/stored_file_name` back as an attachment named
/// `display_file_name`.
///
/// The content type is guessed from the stored name. `request` is only used
/// for its conditional and range headers.
pub async fn download_static_file(
    request: Request,
    source_dir: impl AsRef<Path>,
    stored_file_name: &str,
    display_file_name: &str,
) -> Result<Response> {
    let path = source_dir.as_ref().join(check_file_name(stored_file_name)?);

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(ToolkitError::NotFound(stored_file_name.to_string())),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(ToolkitError::Permission(path.display().to_string()));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ToolkitError::NotFound(stored_file_name.to_string()));
        }
        Err(e) => return Err(ToolkitError::persistence(&path, e)),
    }

    let mut response = ServeFile::new(&path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {})
        .map(Body::new);

    // The file can vanish between the check and the open.
    if response.status() == StatusCode::NOT_FOUND {
        return Err(ToolkitError::NotFound(stored_file_name.to_string()));
    }

    let disposition = HeaderValue::from_str(&content_disposition_header(display_file_name))
        .map_err(|e| ToolkitError::Encoding(e.to_string()))?;
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);

    tracing::debug!(
        "Serving {} as download {:?}",
        path.display(),
        display_file_name
    );

    Ok(response)
}

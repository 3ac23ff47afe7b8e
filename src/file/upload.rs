//! Multipart upload processing.

use std::path::Path;

use axum::extract::Request;
use axum::http::header;
use futures::TryStreamExt;
use multer::{Constraints, Field, Multipart, SizeLimit};
use serde::Serialize;

use super::sniff::SniffedPart;
use super::storage::{base_file_name, FileStorage};
use crate::config::ToolkitConfig;
use crate::{Result, ToolkitError};

/// A file that was stored by the upload engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    /// File name sent by the client, reduced to its last path component.
    pub original_file_name: String,
    /// Name the file was stored under.
    pub new_file_name: String,
    /// Number of bytes written.
    pub file_size: u64,
}

/// Store every file part of a multipart request in `destination`.
///
/// Parts are processed one after another in the order they arrive, and the
/// results keep that order. The first part whose sniffed type is not allowed
/// aborts the whole request; files stored before it are left in place.
///
/// With `rename` each file gets a random name with the original extension,
/// otherwise the client's file name is used and an existing file with that
/// name is replaced.
pub async fn upload_files(
    config: &ToolkitConfig,
    request: Request,
    destination: impl AsRef<Path>,
    rename: bool,
) -> Result<Vec<UploadedFile>> {
    process_upload(config, request, destination.as_ref(), rename, None).await
}

/// Store the single file part of a multipart request in `destination`.
///
/// Fails with [`ToolkitError::MalformedRequest`] when the request holds no
/// file, or when a second file part shows up. The second part is rejected
/// before anything of it is written.
pub async fn upload_one_file(
    config: &ToolkitConfig,
    request: Request,
    destination: impl AsRef<Path>,
    rename: bool,
) -> Result<UploadedFile> {
    process_upload(config, request, destination.as_ref(), rename, Some(1))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ToolkitError::MalformedRequest("no file in request".to_string()))
}

async fn process_upload(
    config: &ToolkitConfig,
    request: Request,
    destination: &Path,
    rename: bool,
    max_files: Option<usize>,
) -> Result<Vec<UploadedFile>> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ToolkitError::MalformedRequest("missing Content-Type header".to_string()))?;

    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| ToolkitError::MalformedRequest(e.to_string()))?;

    let constraints =
        Constraints::new().size_limit(SizeLimit::new().whole_stream(config.max_upload_size));
    let body = request.into_body().into_data_stream();
    let mut multipart = Multipart::with_constraints(body, boundary, constraints);

    let storage = FileStorage::open(destination).await?;
    let mut uploaded = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        // Browsers send `filename=""` for an empty file input.
        let Some(client_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            drain_field(field).await?;
            continue;
        };

        if max_files.is_some_and(|max| uploaded.len() >= max) {
            return Err(ToolkitError::MalformedRequest(
                "expected a single file in request".to_string(),
            ));
        }

        let original = base_file_name(&client_name)?;
        let mut part = SniffedPart::new(Box::pin(field.map_err(multipart_error))).await?;

        let detected = part.content_type();
        tracing::debug!("Sniffed upload {} as {}", original, detected);

        if !config.is_file_type_allowed(detected) {
            tracing::warn!(
                "Rejected upload {}: content type {} is not allowed",
                original,
                detected
            );
            return Err(ToolkitError::UnsupportedFileType {
                file_name: original,
                detected: detected.to_string(),
            });
        }

        let new_name = if rename {
            FileStorage::generate_stored_name(&original)
        } else {
            original.clone()
        };

        let file_size = storage.save_stream(&new_name, &mut part).await?;
        tracing::info!(
            "Stored upload {} as {} ({} bytes)",
            original,
            storage.base_path().join(&new_name).display(),
            file_size
        );

        uploaded.push(UploadedFile {
            original_file_name: original,
            new_file_name: new_name,
            file_size,
        });
    }

    Ok(uploaded)
}

async fn drain_field(mut field: Field<'_>) -> Result<()> {
    while field.chunk().await.map_err(multipart_error)?.is_some() {}
    Ok(())
}

fn multipart_error(err: multer::Error) -> ToolkitError {
    match err {
        multer::Error::StreamSizeExceeded { limit } => ToolkitError::PayloadTooLarge { limit },
        multer::Error::FieldSizeExceeded { limit, .. } => ToolkitError::PayloadTooLarge { limit },
        other => ToolkitError::MalformedRequest(other.to_string()),
    }
}

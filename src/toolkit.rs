//! The toolkit facade.
//!
//! [`Toolkit`] bundles a [`ToolkitConfig`] with every helper operation, so a
//! handler only needs one value from its router state.

use std::fmt::Display;
use std::path::Path;

use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ToolkitConfig;
use crate::file::{self, UploadedFile};
use crate::web::json;
use crate::{random, slug, Result};

/// Helper operations for web handlers, sharing one configuration.
///
/// The configuration is read-only once the toolkit is built, so a single
/// instance can be cloned into router state and used by concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Toolkit {
    config: ToolkitConfig,
}

impl Toolkit {
    /// Create a toolkit with the given configuration.
    pub fn new(config: ToolkitConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// Generate a random alphanumeric string of `length` characters.
    pub fn random_string(&self, length: usize) -> String {
        random::random_string(length)
    }

    /// Turn free text into a URL-safe slug.
    pub fn slugify(&self, input: &str) -> Result<String> {
        slug::slugify(input)
    }

    /// Store every file of a multipart request in `destination`.
    pub async fn upload_files(
        &self,
        request: Request,
        destination: impl AsRef<Path>,
        rename: bool,
    ) -> Result<Vec<UploadedFile>> {
        file::upload_files(&self.config, request, destination, rename).await
    }

    /// Store the single file of a multipart request in `destination`.
    pub async fn upload_one_file(
        &self,
        request: Request,
        destination: impl AsRef<Path>,
        rename: bool,
    ) -> Result<UploadedFile> {
        file::upload_one_file(&self.config, request, destination, rename).await
    }

    /// Create `path` as a directory unless it already is one.
    pub async fn ensure_dir(&self, path: impl AsRef<Path>) -> Result<()> {
        file::ensure_dir(path).await
    }

    /// Respond with `source_dir/stored_file_name` as an attachment.
    pub async fn download_static_file(
        &self,
        request: Request,
        source_dir: impl AsRef<Path>,
        stored_file_name: &str,
        display_file_name: &str,
    ) -> Result<Response> {
        file::download_static_file(request, source_dir, stored_file_name, display_file_name).await
    }

    /// Decode the request body as exactly one JSON value.
    pub async fn read_json<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        json::read_json(&self.config, request).await
    }

    /// Serialize `payload` into a JSON response.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        status: StatusCode,
        payload: &T,
        headers: HeaderMap,
    ) -> Result<Response> {
        json::write_json(status, payload, headers)
    }

    /// Write an error envelope, with status 400 unless `status` is given.
    pub fn error_json(&self, err: impl Display, status: Option<StatusCode>) -> Result<Response> {
        json::error_json(err, status)
    }
}

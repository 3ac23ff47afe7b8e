//! Test helpers for web API tests.
//!
//! Provides a TestServer backed by temporary upload and download directories,
//! plus sample file contents.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;

use webtoolkit::config::FilesConfig;
use webtoolkit::web::handlers::AppState;
use webtoolkit::web::router::{create_health_router, create_router};
use webtoolkit::{Toolkit, ToolkitConfig};

/// A 1x1 transparent PNG.
pub const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// The start of a JFIF JPEG, enough for sniffing.
pub const JPEG_HEADER: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

/// A running test server and its directories.
pub struct TestContext {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    pub download_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestContext {
    /// Names of the files currently in the upload directory.
    pub fn uploaded_names(&self) -> Vec<String> {
        list_dir(&self.upload_dir)
    }

    /// Place a file in the download directory.
    pub fn add_download(&self, name: &str, content: &[u8]) {
        std::fs::write(self.download_dir.join(name), content).expect("Failed to write file");
    }
}

/// Create a test server with the given toolkit configuration.
pub fn create_test_server(config: ToolkitConfig) -> TestContext {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let upload_dir = temp_dir.path().join("uploads");
    let download_dir = temp_dir.path().join("files");
    std::fs::create_dir_all(&download_dir).expect("Failed to create download dir");

    let files = FilesConfig {
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        download_dir: download_dir.to_string_lossy().into_owned(),
    };
    let app_state = Arc::new(AppState::new(Toolkit::new(config), &files));

    let router = create_router(app_state).merge(create_health_router());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestContext {
        server,
        upload_dir,
        download_dir,
        _temp_dir: temp_dir,
    }
}

/// List the entries of a directory, sorted. A missing directory is empty.
pub fn list_dir(path: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

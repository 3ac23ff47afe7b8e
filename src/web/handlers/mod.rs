//! API handlers for the demo server.

pub mod file;
pub mod slug;

pub use file::*;
pub use slug::*;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::FilesConfig;
use crate::Toolkit;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Toolkit used by every handler.
    pub toolkit: Toolkit,
    /// Directory uploads are stored in.
    pub upload_dir: PathBuf,
    /// Directory downloads are served from.
    pub download_dir: PathBuf,
}

impl AppState {
    /// Create a new application state.
    pub fn new(toolkit: Toolkit, files: &FilesConfig) -> Self {
        Self {
            toolkit,
            upload_dir: PathBuf::from(&files.upload_dir),
            download_dir: PathBuf::from(&files.download_dir),
        }
    }
}

impl FromRef<Arc<AppState>> for Toolkit {
    fn from_ref(state: &Arc<AppState>) -> Toolkit {
        state.toolkit.clone()
    }
}

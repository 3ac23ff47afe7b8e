//! Directory provisioning.

use std::io;
use std::path::Path;

use tokio::fs;

use crate::{Result, ToolkitError};

/// Mode used for newly created directories on Unix.
#[cfg(unix)]
const DIR_MODE: u32 = 0o755;

/// Make sure `path` exists as a directory.
///
/// Missing parents are created as well. Calling this on an existing directory
/// is a no-op. Fails with [`ToolkitError::PathConflict`] when something other
/// than a directory is already at `path`.
pub async fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => return Err(ToolkitError::PathConflict(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(map_io_error(path, e)),
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);

    if let Err(e) = builder.create(path).await {
        // A parent may be a regular file.
        if let Ok(meta) = fs::metadata(path).await {
            if !meta.is_dir() {
                return Err(ToolkitError::PathConflict(path.to_path_buf()));
            }
        }
        return Err(map_io_error(path, e));
    }

    tracing::debug!("Created directory {}", path.display());
    Ok(())
}

fn map_io_error(path: &Path, e: io::Error) -> ToolkitError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => ToolkitError::Permission(path.display().to_string()),
        io::ErrorKind::AlreadyExists => ToolkitError::PathConflict(path.to_path_buf()),
        _ => ToolkitError::persistence(path, e),
    }
}

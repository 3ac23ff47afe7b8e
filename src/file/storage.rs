//! Physical file storage for uploads.
//!
//! Files land in a single flat directory. Content is first streamed into a
//! hidden temporary file next to the target and then renamed into place, so
//! a visible file is always complete.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use futures::Stream;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::dir::ensure_dir;
use super::sniff::SniffedPart;
use super::RANDOM_NAME_LENGTH;
use crate::random::random_string;
use crate::{Result, ToolkitError};

/// Reduce a client-supplied file name to its last path component.
///
/// Both `/` and `\` count as separators. Fails with
/// [`ToolkitError::UnsafePath`] when no usable name remains.
pub fn base_file_name(name: &str) -> Result<String> {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    check_file_name(base).map(str::to_string)
}

/// Check that `name` is a single, plain path component.
pub fn check_file_name(name: &str) -> Result<&str> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
        || Path::new(name).is_absolute();

    if unsafe_name {
        return Err(ToolkitError::UnsafePath(name.to_string()));
    }
    Ok(name)
}

/// File storage rooted at one directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Directory files are written to.
    base_path: PathBuf,
}

impl FileStorage {
    /// Open storage at `base_path`, creating the directory if needed.
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        ensure_dir(&base_path).await?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the full path for a stored name.
    pub fn file_path(&self, stored_name: &str) -> Result<PathBuf> {
        Ok(self.base_path.join(check_file_name(stored_name)?))
    }

    /// Stream a sniffed part into `stored_name`, replacing any existing file.
    ///
    /// Returns the number of bytes written.
    pub async fn save_stream<S>(&self, stored_name: &str, part: &mut SniffedPart<S>) -> Result<u64>
    where
        S: Stream<Item = Result<Bytes>> + Unpin,
    {
        let final_path = self.file_path(stored_name)?;
        let temp_path = self
            .base_path
            .join(format!(".upload-{}.part", random_string(16)));

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| ToolkitError::persistence(&temp_path, e))?;

        let written = match Self::write_chunks(&mut file, &temp_path, part).await {
            Ok(written) => written,
            Err(e) => {
                drop(file);
                Self::discard(&temp_path).await;
                return Err(e);
            }
        };
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            Self::discard(&temp_path).await;
            return Err(ToolkitError::persistence(&final_path, e));
        }

        Ok(written)
    }

    async fn write_chunks<S>(
        file: &mut fs::File,
        temp_path: &Path,
        part: &mut SniffedPart<S>,
    ) -> Result<u64>
    where
        S: Stream<Item = Result<Bytes>> + Unpin,
    {
        let mut written = 0u64;
        while let Some(chunk) = part.next_chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| ToolkitError::persistence(temp_path, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| ToolkitError::persistence(temp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| ToolkitError::persistence(temp_path, e))?;

        Ok(written)
    }

    async fn discard(temp_path: &Path) {
        if let Err(e) = fs::remove_file(temp_path).await {
            tracing::warn!(
                "Failed to remove partial upload {}: {}",
                temp_path.display(),
                e
            );
        }
    }

    /// Extract the extension of a file name, including the leading dot.
    ///
    /// Returns an empty string when there is no extension.
    pub fn extension(filename: &str) -> &str {
        match Path::new(filename).extension().and_then(|s| s.to_str()) {
            Some(ext) => &filename[filename.len() - ext.len() - 1..],
            None => "",
        }
    }

    /// Generate a random stored name that keeps the original extension.
    pub fn generate_stored_name(original_name: &str) -> String {
        format!(
            "{}{}",
            random_string(RANDOM_NAME_LENGTH),
            Self::extension(original_name)
        )
    }
}

//! File handling for webtoolkit.
//!
//! This module provides the filesystem-facing operations:
//! - Streaming multipart uploads with content sniffing and an allow-list
//! - Atomic persistence into a destination directory
//! - Forced-download responses for stored files
//! - Idempotent directory provisioning

mod dir;
mod download;
mod sniff;
mod storage;
mod upload;

pub use dir::ensure_dir;
pub use download::{content_disposition_header, download_static_file};
pub use sniff::{detect_content_type, SniffedPart, SNIFF_LEN};
pub use storage::{base_file_name, check_file_name, FileStorage};
pub use upload::{upload_files, upload_one_file, UploadedFile};

/// Length of the random base name given to renamed uploads.
pub const RANDOM_NAME_LENGTH: usize = 25;

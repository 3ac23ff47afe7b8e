//! webtoolkit - helper operations for axum web handlers.
//!
//! Streaming multipart uploads with content sniffing, forced-download
//! responses, strict JSON decoding, random identifiers and slugs.

pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod random;
pub mod slug;
pub mod toolkit;
pub mod web;

pub use config::{Config, ToolkitConfig};
pub use error::{ErrorKind, Result, ToolkitError};
pub use file::{ensure_dir, upload_files, upload_one_file, UploadedFile};
pub use random::random_string;
pub use slug::slugify;
pub use toolkit::Toolkit;
pub use web::{JsonResponse, StrictJson};

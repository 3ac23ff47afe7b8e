//! Error types for webtoolkit.

use std::path::PathBuf;

use thiserror::Error;

/// Broad category of a [`ToolkitError`].
///
/// Handlers usually only need the kind to decide how to answer a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller-supplied configuration or arguments.
    Configuration,
    /// Input was well-formed but not acceptable.
    Validation,
    /// A size limit was exceeded.
    Capacity,
    /// Filesystem failure.
    Io,
    /// The request body could not be parsed at the wire level.
    Protocol,
    /// A payload could not be serialized. Always a programming error.
    Encoding,
}

/// Common error type for webtoolkit.
#[derive(Error, Debug)]
pub enum ToolkitError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The sniffed content type of an uploaded file is not allowed.
    #[error("the uploaded file type is not permitted: {file_name} ({detected})")]
    UnsupportedFileType { file_name: String, detected: String },

    /// A JSON value had the wrong type for its target field.
    #[error("body contains incorrect JSON type: {0}")]
    TypeMismatch(String),

    /// The JSON body contained a key the target does not know.
    #[error("body contains unknown key \"{0}\"")]
    UnknownField(String),

    /// Slug input had no usable characters.
    #[error("empty string not permitted")]
    EmptyInput,

    /// The JSON body was empty.
    #[error("body must not be empty")]
    EmptyBody,

    /// More than one JSON value in the body.
    #[error("body must only contain a single JSON value")]
    TrailingData,

    /// A file name that would escape its directory.
    #[error("unsafe file name: {0:?}")]
    UnsafePath(String),

    /// Multipart body larger than the upload limit.
    #[error("request body exceeds the upload limit of {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    /// JSON body larger than the JSON limit.
    #[error("body must be no larger than {limit} bytes")]
    BodyTooLarge { limit: u64 },

    /// Failed to write a file.
    #[error("failed to persist {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// A path exists but is not a directory.
    #[error("path exists and is not a directory: {}", .0.display())]
    PathConflict(PathBuf),

    /// The multipart body could not be read.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The JSON body is not well-formed.
    #[error("body contains badly-formed JSON: {0}")]
    Syntax(String),

    /// A response payload could not be serialized.
    #[error("failed to encode JSON: {0}")]
    Encoding(String),
}

impl ToolkitError {
    /// Build a persistence error for `path`.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolkitError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolkitError::Configuration(_) => ErrorKind::Configuration,
            ToolkitError::UnsupportedFileType { .. }
            | ToolkitError::TypeMismatch(_)
            | ToolkitError::UnknownField(_)
            | ToolkitError::EmptyInput
            | ToolkitError::EmptyBody
            | ToolkitError::TrailingData
            | ToolkitError::UnsafePath(_) => ErrorKind::Validation,
            ToolkitError::PayloadTooLarge { .. } | ToolkitError::BodyTooLarge { .. } => {
                ErrorKind::Capacity
            }
            ToolkitError::Persistence { .. }
            | ToolkitError::NotFound(_)
            | ToolkitError::Permission(_)
            | ToolkitError::PathConflict(_) => ErrorKind::Io,
            ToolkitError::MalformedRequest(_) | ToolkitError::Syntax(_) => ErrorKind::Protocol,
            ToolkitError::Encoding(_) => ErrorKind::Encoding,
        }
    }
}

/// Result type alias for webtoolkit operations.
pub type Result<T> = std::result::Result<T, ToolkitError>;

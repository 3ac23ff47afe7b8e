//! Configuration module for webtoolkit.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, ToolkitError};

/// Default maximum JSON body size (1MB).
pub const DEFAULT_MAX_JSON_SIZE: u64 = 1024 * 1024;

/// Server configuration for the demo binary.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Directory configuration for the demo binary.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Directory uploaded files are written to.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Directory downloads are served from.
    #[serde(default = "default_download_dir")]
    pub download_dir: String,
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_download_dir() -> String {
    "./files".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            download_dir: default_download_dir(),
        }
    }
}

/// Limits and policies applied by the toolkit operations.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ToolkitConfig {
    /// Maximum size of a multipart upload body in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    /// MIME types accepted by the upload engine. Empty allows everything.
    #[serde(default)]
    pub allowed_file_types: Vec<String>,
    /// Maximum size of a JSON request body in bytes.
    #[serde(default = "default_max_json_size")]
    pub max_json_size: u64,
    /// Whether JSON bodies may carry keys the target type does not declare.
    #[serde(default)]
    pub allow_unknown_json_fields: bool,
}

fn default_max_upload_size() -> u64 {
    u64::MAX
}

fn default_max_json_size() -> u64 {
    DEFAULT_MAX_JSON_SIZE
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            max_upload_size: default_max_upload_size(),
            allowed_file_types: Vec::new(),
            max_json_size: default_max_json_size(),
            allow_unknown_json_fields: false,
        }
    }
}

impl ToolkitConfig {
    /// Set the upload size limit.
    pub fn with_max_upload_size(mut self, bytes: u64) -> Self {
        self.max_upload_size = bytes;
        self
    }

    /// Set the allowed upload MIME types.
    pub fn with_allowed_file_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_file_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the JSON body size limit.
    pub fn with_max_json_size(mut self, bytes: u64) -> Self {
        self.max_json_size = bytes;
        self
    }

    /// Allow or reject unknown JSON keys.
    pub fn with_allow_unknown_json_fields(mut self, allow: bool) -> Self {
        self.allow_unknown_json_fields = allow;
        self
    }

    /// Whether an upload with the given sniffed type passes the allow-list.
    ///
    /// Parameters such as `; charset=utf-8` are ignored on both sides.
    pub fn is_file_type_allowed(&self, detected: &str) -> bool {
        if self.allowed_file_types.is_empty() {
            return true;
        }
        let detected = mime_essence(detected);
        self.allowed_file_types
            .iter()
            .any(|allowed| mime_essence(allowed).eq_ignore_ascii_case(detected))
    }

    /// Check the limits and the allow-list for obviously wrong values.
    pub fn validate(&self) -> Result<()> {
        if self.max_upload_size == 0 {
            return Err(ToolkitError::Configuration(
                "max_upload_size must be greater than zero".to_string(),
            ));
        }
        if self.max_json_size == 0 {
            return Err(ToolkitError::Configuration(
                "max_json_size must be greater than zero".to_string(),
            ));
        }
        for mime in &self.allowed_file_types {
            let essence = mime_essence(mime);
            let valid = essence
                .split_once('/')
                .map(|(ty, sub)| !ty.is_empty() && !sub.is_empty() && !sub.contains('/'))
                .unwrap_or(false);
            if !valid {
                return Err(ToolkitError::Configuration(format!(
                    "allowed_file_types entry {mime:?} is not a MIME type"
                )));
            }
        }
        Ok(())
    }
}

fn mime_essence(mime: &str) -> &str {
    mime.split(';').next().unwrap_or("").trim()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty logs to the console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload and download directories.
    #[serde(default)]
    pub files: FilesConfig,
    /// Toolkit limits and policies.
    #[serde(default)]
    pub toolkit: ToolkitConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ToolkitError::Configuration(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ToolkitError::Configuration(format!("config parse error: {e}")))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.files.upload_dir.trim().is_empty() {
            return Err(ToolkitError::Configuration(
                "files.upload_dir must not be empty".to_string(),
            ));
        }
        if self.files.download_dir.trim().is_empty() {
            return Err(ToolkitError::Configuration(
                "files.download_dir must not be empty".to_string(),
            ));
        }
        self.toolkit.validate()
    }
}

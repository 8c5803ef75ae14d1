use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TcslimError>;

#[derive(Error, Debug)]
pub enum TcslimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Download failed: {url} returned HTTP {status}")]
    DownloadError { url: String, status: u16 },

    #[error("Extraction failed: {path}: {message}")]
    ExtractionError { path: PathBuf, message: String },

    #[error("Unsupported archive format: {name}")]
    UnsupportedArchive { name: String },

    #[error("Installer not found: {path}")]
    InstallerNotFound { path: PathBuf },

    #[error("'{program}' exited with status {code}")]
    CommandFailed { program: String, code: i32 },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Invalid version format: '{version}'")]
    InvalidVersion { version: String },

    #[error("Invalid prune policy: {message}")]
    PolicyError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },
}

impl TcslimError {
    pub fn policy_error<S: Into<String>>(message: S) -> Self {
        TcslimError::PolicyError {
            message: message.into(),
        }
    }

    pub fn config_error<S: Into<String>>(message: S) -> Self {
        TcslimError::ConfigError {
            message: message.into(),
        }
    }

    pub fn extraction_error<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        TcslimError::ExtractionError {
            path: path.into(),
            message: message.into(),
        }
    }
}

//! Error types for registry-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Registry file not found at {path}")]
    RegistryNotFound { path: PathBuf },

    #[error("Invalid registry file {path}: {message}")]
    InvalidRegistry { path: PathBuf, message: String },

    #[error("Unsupported registry format for {path} (expected .yaml, .yml or .json)")]
    UnsupportedRegistryFormat { path: PathBuf },

    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Invalid development status: {status}")]
    InvalidStatus { status: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

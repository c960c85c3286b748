//! Error types for registry-core

use std::path::PathBuf;

/// Result type for registry-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in registry-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error on a local file
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to lock the output file
    #[error("Failed to lock {path}")]
    LockFailed { path: PathBuf },

    #[error("Unable to serialize run output: {0}")]
    Serialize(#[from] serde_json::Error),

    // Transparent wrappers for underlying crate errors
    /// Registry or configuration error from registry-meta
    #[error(transparent)]
    Meta(#[from] registry_meta::Error),

    /// Manifest contract violation from registry-manifest
    #[error(transparent)]
    Manifest(#[from] registry_manifest::Error),

    /// Network error from registry-index
    #[error(transparent)]
    Index(#[from] registry_index::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! Error types for registry-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Registry or configuration error from registry-meta
    #[error(transparent)]
    Meta(#[from] registry_meta::Error),

    /// HTTP client setup error from registry-index
    #[error(transparent)]
    Index(#[from] registry_index::Error),

    /// Output error from registry-core
    #[error(transparent)]
    Core(#[from] registry_core::Error),
}

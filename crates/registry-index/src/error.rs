//! Error types for registry-index

/// Result type for registry-index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to remote resources.
///
/// Callers in a registry run turn these into diagnostics; they never abort
/// the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP client could not be set up
    #[error("Unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be completed
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The index answered with something that is not a release record
    #[error("Invalid index record for {package}: {message}")]
    InvalidRecord { package: String, message: String },

    /// The wheel has no `*.dist-info/entry_points.txt`
    #[error("No entry_points.txt found in wheel")]
    MissingEntryPoints,

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Manifest(#[from] registry_manifest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn http(url: &str, source: reqwest::Error) -> Self {
        match source.status() {
            Some(status) => Self::Status {
                url: url.to_string(),
                status: status.as_u16(),
            },
            None => Self::Http {
                url: url.to_string(),
                source,
            },
        }
    }
}

//! Error types for registry-manifest

use crate::format::BuildTool;

/// Result type for registry-manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading build manifests.
///
/// Malformed documents are not errors: parsers report them as warnings and
/// return empty data. The variants here are contract violations of a
/// manifest format or syntax errors of the lower-level readers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A field the format declares mandatory is absent.
    #[error("{format} manifest is missing mandatory field '{field}'")]
    MissingField { format: BuildTool, field: String },

    /// A mandatory field is present but has the wrong type.
    #[error("{format} manifest field '{field}' must be {expected}")]
    InvalidField {
        format: BuildTool,
        field: String,
        expected: &'static str,
    },

    /// INI syntax error.
    #[error("line {line}: {message}")]
    Ini { line: usize, message: String },

    /// PEP 508 requirement that could not be parsed.
    #[error("invalid requirement '{requirement}': {reason}")]
    InvalidRequirement { requirement: String, reason: String },

    /// Version range the canonicalizer does not accept.
    #[error("invalid version range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },
}

impl Error {
    pub(crate) fn missing(format: BuildTool, field: impl Into<String>) -> Self {
        Self::MissingField {
            format,
            field: field.into(),
        }
    }

    pub(crate) fn ini(line: usize, message: impl Into<String>) -> Self {
        Self::Ini {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn requirement(requirement: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRequirement {
            requirement: requirement.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn range(range: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            range: range.to_string(),
            reason: reason.into(),
        }
    }
}

//! Plugin development status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Development status of a plugin.
///
/// Mirrors the `Development Status` Trove classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DevelopmentStatus {
    /// Not yet ready to use. Developers welcome!
    #[default]
    Planning,
    PreAlpha,
    /// Adds new functionality, not yet ready for production.
    Alpha,
    Beta,
    /// Ready for production calculations.
    Stable,
    Mature,
    /// No longer maintained.
    Inactive,
}

impl DevelopmentStatus {
    pub const ALL: [DevelopmentStatus; 7] = [
        Self::Planning,
        Self::PreAlpha,
        Self::Alpha,
        Self::Beta,
        Self::Stable,
        Self::Mature,
        Self::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::PreAlpha => "pre-alpha",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Stable => "stable",
            Self::Mature => "mature",
            Self::Inactive => "inactive",
        }
    }

    /// The Trove classifier that declares this status.
    pub fn classifier(&self) -> &'static str {
        match self {
            Self::Planning => "Development Status :: 1 - Planning",
            Self::PreAlpha => "Development Status :: 2 - Pre-Alpha",
            Self::Alpha => "Development Status :: 3 - Alpha",
            Self::Beta => "Development Status :: 4 - Beta",
            Self::Stable => "Development Status :: 5 - Production/Stable",
            Self::Mature => "Development Status :: 6 - Mature",
            Self::Inactive => "Development Status :: 7 - Inactive",
        }
    }

    /// Map a Trove classifier to a status, if it is a status classifier.
    pub fn from_classifier(classifier: &str) -> Option<Self> {
        let classifier = classifier.trim();
        Self::ALL.into_iter().find(|s| s.classifier() == classifier)
    }
}

impl FromStr for DevelopmentStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::InvalidStatus {
                status: s.to_string(),
            })
    }
}

impl fmt::Display for DevelopmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

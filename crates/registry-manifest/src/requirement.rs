//! PEP 508 dependency specifications.
//!
//! Only what is needed to find a dependency by name and read its version
//! specifiers is interpreted. Environment markers and direct URL references
//! are recognized and kept verbatim.
//!
//! # Examples
//!
//! ```
//! use registry_manifest::requirement::{Operator, Requirement};
//!
//! let req: Requirement = "aiida-core[atomic_tools] (>=2.0,<3) ; python_version >= '3.9'"
//!     .parse()
//!     .unwrap();
//! assert_eq!(req.name, "aiida-core");
//! assert_eq!(req.extras, vec!["atomic_tools"]);
//! assert_eq!(req.specifiers[0].op, Operator::GreaterEqual);
//! assert_eq!(req.marker.as_deref(), Some("python_version >= '3.9'"));
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)").unwrap()
});

static SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(===|==|!=|~=|>=|<=|>|<)\s*([A-Za-z0-9_.*+!-]+)$").unwrap()
});

/// A version comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `===`
    ArbitraryEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `~=`
    Compatible,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `<`
    Less,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ArbitraryEqual => "===",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Compatible => "~=",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::Less => "<",
        }
    }

    /// Position of the operator when specifiers are listed, lowest first.
    ///
    /// Pins come first, then lower bounds, then upper bounds; all other
    /// operators share the last position.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Equal => 0,
            Self::GreaterEqual => 1,
            Self::Greater => 2,
            Self::LessEqual => 3,
            Self::Less => 4,
            Self::ArbitraryEqual | Self::NotEqual | Self::Compatible => 10,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "===" => Ok(Self::ArbitraryEqual),
            "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            "~=" => Ok(Self::Compatible),
            ">=" => Ok(Self::GreaterEqual),
            "<=" => Ok(Self::LessEqual),
            ">" => Ok(Self::Greater),
            "<" => Ok(Self::Less),
            _ => Err(Error::requirement(s, "unknown operator")),
        }
    }
}

/// An operator paired with a version, e.g. `>=2.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub op: Operator,
    pub version: String,
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.version)
    }
}

/// A parsed dependency specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    /// Version specifiers in the order written.
    pub specifiers: Vec<Specifier>,
    /// Environment marker after `;`, unevaluated.
    pub marker: Option<String>,
    /// Direct reference after `@`.
    pub url: Option<String>,
}

impl Requirement {
    pub fn parse(line: &str) -> Result<Self> {
        line.parse()
    }
}

impl FromStr for Requirement {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let text = strip_comment(line).trim();
        if text.is_empty() {
            return Err(Error::requirement(line, "empty requirement"));
        }

        let name = NAME
            .captures(text)
            .and_then(|c| c.get(1))
            .ok_or_else(|| Error::requirement(line, "missing package name"))?;
        let mut rest = text[name.end()..].trim_start();
        let name = name.as_str().to_string();

        let mut extras = Vec::new();
        if let Some(after) = rest.strip_prefix('[') {
            let close = after
                .find(']')
                .ok_or_else(|| Error::requirement(line, "unclosed extras"))?;
            extras = after[..close]
                .split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .collect();
            rest = after[close + 1..].trim_start();
        }

        if let Some(reference) = rest.strip_prefix('@') {
            // A marker after a URL must be separated by whitespace.
            let (url, marker) = match reference.find(" ;") {
                Some(i) => (&reference[..i], Some(&reference[i + 2..])),
                None => (reference, None),
            };
            let url = url.trim();
            if url.is_empty() {
                return Err(Error::requirement(line, "empty URL reference"));
            }
            return Ok(Self {
                name,
                extras,
                specifiers: Vec::new(),
                marker: non_empty(marker),
                url: Some(url.to_string()),
            });
        }

        let (versions, marker) = match rest.split_once(';') {
            Some((versions, marker)) => (versions, Some(marker)),
            None => (rest, None),
        };

        let mut versions = versions.trim();
        if let Some(inner) = versions.strip_prefix('(') {
            versions = inner
                .strip_suffix(')')
                .ok_or_else(|| Error::requirement(line, "unclosed parenthesis"))?
                .trim();
        }

        let mut specifiers = Vec::new();
        for clause in versions.split(',').map(str::trim) {
            if clause.is_empty() {
                if versions.is_empty() {
                    break;
                }
                return Err(Error::requirement(line, "empty version specifier"));
            }
            let caps = SPECIFIER
                .captures(clause)
                .ok_or_else(|| Error::requirement(line, format!("invalid specifier '{clause}'")))?;
            specifiers.push(Specifier {
                op: caps[1].parse()?,
                version: caps[2].to_string(),
            });
        }

        Ok(Self {
            name,
            extras,
            specifiers,
            marker: non_empty(marker),
            url: None,
        })
    }
}

fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #") {
        Some(i) => &line[..i],
        None => line,
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

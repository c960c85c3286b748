//! Per-plugin diagnostics collection.
//!
//! Every stage of a run reports problems through a [`DiagnosticSink`]. The
//! [`Reporter`] attributes each message to the plugin currently being
//! processed, keeps a flat ordered list of all findings for the end-of-run
//! summary, and streams every message through `tracing` as it arrives.
//!
//! ```
//! use registry_meta::report::{DiagnosticSink, Reporter};
//!
//! let mut reporter = Reporter::new();
//! {
//!     let mut scope = reporter.scope("aiida-foo");
//!     scope.warn("Missing classifier 'Framework :: AiiDA'".to_string());
//! }
//! assert_eq!(reporter.drain("aiida-foo").warnings.len(), 1);
//! assert_eq!(reporter.summary().len(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Messages collected for one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    fn push(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Warning => self.warnings.push(message),
            Severity::Error => self.errors.push(message),
        }
    }

    /// Append all messages of `other`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// One entry of the flat, run-wide findings list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Plugin the finding belongs to; empty when reported outside any plugin.
    pub entity: String,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entity.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.entity, self.message)
        }
    }
}

/// Destination for warnings and errors.
///
/// Reporting never fails.
pub trait DiagnosticSink {
    fn warn(&mut self, message: String);
    fn error(&mut self, message: String);
}

/// A plain collector, useful where no run-wide reporter exists.
impl DiagnosticSink for Diagnostics {
    fn warn(&mut self, message: String) {
        self.push(Severity::Warning, message);
    }

    fn error(&mut self, message: String) {
        self.push(Severity::Error, message);
    }
}

/// Collects findings for a whole run.
///
/// Not shared between threads: a concurrent run gives each worker its own
/// reporter and merges the records afterwards.
#[derive(Debug, Default)]
pub struct Reporter {
    active: Option<String>,
    entities: HashMap<String, Diagnostics>,
    findings: Vec<Finding>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute subsequent messages to `name`.
    pub fn set_active_entity(&mut self, name: impl Into<String>) {
        self.active = Some(name.into());
    }

    pub fn clear_active_entity(&mut self) {
        self.active = None;
    }

    pub fn active_entity(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Borrow a handle whose messages are attributed to `name` only.
    pub fn scope(&mut self, name: impl Into<String>) -> Scope<'_> {
        Scope {
            entity: name.into(),
            reporter: self,
        }
    }

    /// Messages collected for `entity` so far.
    ///
    /// The messages stay in the reporter.
    pub fn drain(&self, entity: &str) -> Diagnostics {
        self.entities.get(entity).cloned().unwrap_or_default()
    }

    /// Every finding of the run, in the order reported.
    pub fn summary(&self) -> &[Finding] {
        &self.findings
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    fn record(&mut self, entity: &str, severity: Severity, message: String) {
        match severity {
            Severity::Warning => tracing::warn!(plugin = entity, "{message}"),
            Severity::Error => tracing::error!(plugin = entity, "{message}"),
        }
        if !entity.is_empty() {
            self.entities
                .entry(entity.to_string())
                .or_default()
                .push(severity, message.clone());
        }
        self.findings.push(Finding {
            entity: entity.to_string(),
            severity,
            message,
        });
    }
}

impl DiagnosticSink for Reporter {
    fn warn(&mut self, message: String) {
        let entity = self.active.clone().unwrap_or_default();
        self.record(&entity, Severity::Warning, message);
    }

    fn error(&mut self, message: String) {
        let entity = self.active.clone().unwrap_or_default();
        self.record(&entity, Severity::Error, message);
    }
}

/// Reporter handle bound to one plugin.
#[derive(Debug)]
pub struct Scope<'a> {
    reporter: &'a mut Reporter,
    entity: String,
}

impl Scope<'_> {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Messages collected for this scope's plugin so far.
    pub fn diagnostics(&self) -> Diagnostics {
        self.reporter.drain(&self.entity)
    }
}

impl DiagnosticSink for Scope<'_> {
    fn warn(&mut self, message: String) {
        self.reporter.record(&self.entity, Severity::Warning, message);
    }

    fn error(&mut self, message: String) {
        self.reporter.record(&self.entity, Severity::Error, message);
    }
}

//! A registry run: every registered plugin in name order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use registry_meta::{CanonicalPluginRecord, DiagnosticSink, Finding, Registry, Reporter};

use crate::reconcile::Reconciler;

/// Result of one run, serialized as the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutput {
    pub plugins: BTreeMap<String, CanonicalPluginRecord>,
    /// Every finding of the run, in the order reported.
    pub summary: Vec<Finding>,
}

impl RunOutput {
    pub fn has_errors(&self) -> bool {
        self.plugins.values().any(|p| !p.diagnostics.errors.is_empty())
    }
}

/// Complete every registration, or only those named in `filter`.
///
/// Each registration yields exactly one record. When completion fails the
/// failure is recorded as an error of that plugin and the record carries
/// the registration data only.
pub fn run(
    registry: &Registry,
    filter: Option<&[String]>,
    reconciler: &Reconciler<'_>,
    reporter: &mut Reporter,
) -> RunOutput {
    if let Some(names) = filter {
        for name in names.iter().filter(|n| !registry.contains_key(n.as_str())) {
            reporter.warn(format!("Plugin '{name}' not found in registry"));
        }
    }

    let mut plugins = BTreeMap::new();
    let selected = registry
        .iter()
        .filter(|(name, _)| filter.is_none_or(|names| names.contains(*name)));
    for (name, registration) in selected {
        tracing::info!(plugin = %name, "Processing plugin");
        let mut scope = reporter.scope(name.as_str());
        let mut record = match reconciler.complete(name, registration, &mut scope) {
            Ok(record) => record,
            Err(e) => {
                scope.error(e.to_string());
                CanonicalPluginRecord::from_registration(name, registration)
            }
        };
        record.diagnostics = scope.diagnostics();
        plugins.insert(name.clone(), record);
    }

    RunOutput {
        plugins,
        summary: reporter.summary().to_vec(),
    }
}

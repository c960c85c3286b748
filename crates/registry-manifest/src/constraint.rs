//! Resolution of the framework version a plugin is compatible with.
//!
//! Two dialects are understood: lists of PEP 508 requirement strings
//! (`install_requires`, `project.dependencies`, `requires_dist`) and
//! Poetry dependency tables.

use registry_meta::DiagnosticSink;
use registry_meta::constants::is_framework_package;

use crate::range::canonicalize_range;
use crate::requirement::{Requirement, Specifier};

/// Resolve the framework constraint from PEP 508 requirement strings.
///
/// Specifiers of every requirement naming the framework are collected,
/// ordered pins first, then lower bounds, then upper bounds, and joined
/// with `,`. Lines that do not parse are skipped.
///
/// ```
/// use registry_manifest::framework_version_from_requirements;
///
/// let reqs = ["aiida-core>=1.0,<2.0".to_string(), "numpy>=1.2".to_string()];
/// assert_eq!(framework_version_from_requirements(&reqs).as_deref(), Some(">=1.0,<2.0"));
/// ```
pub fn framework_version_from_requirements<S: AsRef<str>>(requirements: &[S]) -> Option<String> {
    let mut specifiers: Vec<Specifier> = Vec::new();
    for line in requirements {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        match Requirement::parse(line) {
            Ok(req) if is_framework_package(&req.name) => specifiers.extend(req.specifiers),
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "Skipping requirement"),
        }
    }

    if specifiers.is_empty() {
        return None;
    }

    // Stable, so equal-precedence specifiers keep their written order
    specifiers.sort_by_key(|s| s.op.precedence());
    Some(
        specifiers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Resolve the framework constraint from a Poetry `dependencies` table.
///
/// The entry's value is either a version string or a table with a
/// `version` key. The range is canonicalized to PEP 440 form; an invalid
/// range is reported and treated as unspecified.
pub fn framework_version_from_poetry(
    dependencies: Option<&toml::Value>,
    sink: &mut dyn DiagnosticSink,
) -> Option<String> {
    let table = dependencies?.as_table()?;
    let (_, value) = table.iter().find(|(name, _)| is_framework_package(name))?;

    let range = match value {
        toml::Value::String(s) => s.as_str(),
        toml::Value::Table(t) => t.get("version").and_then(toml::Value::as_str)?,
        _ => return None,
    };

    match canonicalize_range(range) {
        Ok(canonical) => Some(canonical),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected Poetry range");
            sink.warn("Invalid version encountered in Poetry pyproject.toml for aiida-core".to_string());
            None
        }
    }
}

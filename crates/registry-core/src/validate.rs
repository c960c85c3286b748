//! Convention checks on a reconciled plugin record.
//!
//! None of the checks fail: every finding goes to the sink. The only
//! mutation is the resolution of `development_status`.

use registry_index::Fetch;
use registry_meta::constants::{
    CORE_PACKAGE, ENTRY_POINT_NAMESPACE, FRAMEWORK_CLASSIFIER, MISSING_PREFIX, PACKAGE_NAME_PREFIX,
};
use registry_meta::{CanonicalPluginRecord, DevelopmentStatus, DiagnosticSink, PluginRegistration};

/// What the reconciler learned while gathering data that the checks need.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext {
    /// The index answered but published no dependency list at all.
    pub requires_dist_missing: bool,
}

/// Run every check on `record`, in reporting order.
pub fn validate(
    record: &mut CanonicalPluginRecord,
    registration: &PluginRegistration,
    context: ValidationContext,
    fetcher: &dyn Fetch,
    sink: &mut dyn DiagnosticSink,
) {
    check_framework_version(record, context, sink);
    check_classifiers(record, sink);
    record.development_status =
        resolve_development_status(record, registration.development_status.as_deref(), sink);
    if let Some(url) = record.documentation_url.as_deref() {
        check_documentation(url, fetcher, sink);
    }
    check_entry_point_prefix(record, sink);
}

/// Warn when no framework version constraint could be resolved.
///
/// A release without any dependency list most likely lacks a wheel, which
/// is already reported, so the warning is suppressed there.
pub fn check_framework_version(
    record: &CanonicalPluginRecord,
    context: ValidationContext,
    sink: &mut dyn DiagnosticSink,
) {
    if record.aiida_version.is_none() && !context.requires_dist_missing {
        sink.warn("AiiDA version not specified".to_string());
    }
}

pub fn check_classifiers(record: &CanonicalPluginRecord, sink: &mut dyn DiagnosticSink) {
    let Some(metadata) = record.metadata.as_ref().filter(|m| !m.is_empty()) else {
        return;
    };
    if !metadata.classifiers().iter().any(|c| c == FRAMEWORK_CLASSIFIER) {
        sink.warn(format!("Missing classifier '{FRAMEWORK_CLASSIFIER}'"));
    }
}

/// The development status of the plugin.
///
/// A status in the registration wins over the classifiers but is
/// deprecated. Otherwise the first status classifier is used, falling back
/// to `planning`. An unknown registered status is reported as an error and
/// kept as given.
pub fn resolve_development_status(
    record: &CanonicalPluginRecord,
    registered: Option<&str>,
    sink: &mut dyn DiagnosticSink,
) -> String {
    let classifiers = record
        .metadata
        .as_ref()
        .map(|m| m.classifiers())
        .unwrap_or_default();

    let mut statuses = classifiers
        .iter()
        .filter_map(|c| DevelopmentStatus::from_classifier(c));
    let from_classifiers = statuses.next();
    if statuses.next().is_some() {
        sink.warn("Multiple development statuses found in classifiers".to_string());
    }

    let Some(registered) = registered else {
        return from_classifiers.unwrap_or_default().to_string();
    };

    if let Some(status) = from_classifiers.filter(|s| s.as_str() != registered) {
        sink.warn(format!(
            "Development status in classifiers ({status}) does not match development_status in metadata ({registered})"
        ));
    }
    sink.warn(
        "`development_status` key is deprecated. Use PyPI Trove classifiers in the plugin repository instead."
            .to_string(),
    );
    if registered.parse::<DevelopmentStatus>().is_err() {
        sink.error(format!("Invalid development status '{registered}'"));
    }
    registered.to_string()
}

pub fn check_documentation(url: &str, fetcher: &dyn Fetch, sink: &mut dyn DiagnosticSink) {
    if let Err(e) = fetcher.check(url) {
        tracing::debug!(url, error = %e, "Documentation check failed");
        sink.warn(format!("Unable to reach documentation URL: {url}"));
    }
}

/// Every entry point in a framework group must start with the registered
/// prefix, and the prefix must match the package name.
///
/// The framework core package is exempt. Without a registered prefix the
/// plugin should not declare any framework entry points at all.
pub fn check_entry_point_prefix(record: &CanonicalPluginRecord, sink: &mut dyn DiagnosticSink) {
    if record.name == CORE_PACKAGE {
        return;
    }

    let prefix = match record.entry_point_prefix.as_deref() {
        Some(prefix) => {
            let expected = format!("{PACKAGE_NAME_PREFIX}{}", prefix.to_lowercase());
            if expected != record.package_name.to_lowercase() {
                sink.warn(format!("Prefix '{prefix}' does not follow naming convention."));
            }
            prefix
        }
        None => MISSING_PREFIX,
    };

    let framework_groups = record
        .entry_points
        .iter()
        .filter(|(group, _)| group.starts_with(ENTRY_POINT_NAMESPACE));
    for (_, entries) in framework_groups {
        for name in entries.keys().filter(|name| !name.starts_with(prefix)) {
            sink.warn(format!(
                "Entry point '{name}' does not start with prefix '{prefix}.'"
            ));
        }
    }
}

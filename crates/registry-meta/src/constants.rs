//! Constants describing the host framework and its plugin conventions.

/// Name of the framework's own core package.
///
/// A registration with this name is the framework itself rather than a
/// plugin and is exempt from plugin naming rules.
pub const CORE_PACKAGE: &str = "aiida-core";

/// Package names under which a dependency on the framework may be declared.
pub const FRAMEWORK_PACKAGE_NAMES: &[&str] = &["aiida-core", "aiida_core", "aiida"];

/// Prefix of the entry-point groups reserved by the framework.
pub const ENTRY_POINT_NAMESPACE: &str = "aiida.";

/// Prefix that a plugin's package name is expected to carry in front of its
/// entry-point prefix (`aiida_<prefix>`).
pub const PACKAGE_NAME_PREFIX: &str = "aiida_";

/// Sentinel prefix used when a plugin declares no entry-point prefix.
///
/// No real entry point starts with it, so every framework-namespaced entry
/// point of such a plugin is reported.
pub const MISSING_PREFIX: &str = "MISSING";

/// Trove classifier every plugin should declare.
pub const FRAMEWORK_CLASSIFIER: &str = "Framework :: AiiDA";

/// Metadata keys read verbatim from build manifests.
pub const METADATA_KEYS: &[&str] = &["author", "author_email", "version", "description"];

/// Package-index artifact kind of a built distribution.
pub const WHEEL_PACKAGE_TYPE: &str = "bdist_wheel";

/// Markers that identify a pre-release version string.
pub const PRE_RELEASE_MARKERS: &[&str] = &["a", "b", "rc"];

/// Returns true if `name` refers to the framework package.
///
/// Comparison follows package-name normalization: case-insensitive, with
/// runs of `-`, `_` and `.` treated as equal.
pub fn is_framework_package(name: &str) -> bool {
    let normalized = normalize_package_name(name);
    FRAMEWORK_PACKAGE_NAMES
        .iter()
        .any(|candidate| normalize_package_name(candidate) == normalized)
}

/// Normalize a package name: lowercase, separators collapsed to `-`.
pub fn normalize_package_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !last_was_sep {
                out.push('-');
            }
            last_was_sep = true;
        } else {
            out.extend(c.to_lowercase());
            last_was_sep = false;
        }
    }
    out
}

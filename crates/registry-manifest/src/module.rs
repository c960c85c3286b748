//! Extraction of `__version__` from a Python module.

use std::sync::LazyLock;

use regex::Regex;

static VERSION_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^__version__\s*(?::[^=]*)?=\s*(?:"([^"]*)"|'([^']*)')\s*(?:#.*)?$"#).unwrap()
});

/// Read the string assigned to a top-level `__version__`.
///
/// Only plain string literals are recognized; indented assignments belong
/// to a nested block and are ignored.
///
/// ```
/// use registry_manifest::version_from_module;
///
/// let module = "\"\"\"Plugin.\"\"\"\n__version__ = '2.1.0'\n";
/// assert_eq!(version_from_module(module).as_deref(), Some("2.1.0"));
/// ```
pub fn version_from_module(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let caps = VERSION_ASSIGNMENT.captures(line.trim_end())?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    })
}

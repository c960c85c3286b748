//! Registration, intermediate and canonical plugin records.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::report::Diagnostics;

/// Entry points declared by a plugin: `group -> { name -> target }`.
pub type EntryPoints = BTreeMap<String, BTreeMap<String, String>>;

/// A plugin as registered in the registry file.
///
/// The plugin name is the key of the registry mapping and is not repeated
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginRegistration {
    /// URL of the plugin's source repository.
    pub code_home: String,
    /// Requirement specifier used to install the plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pip_url: Option<String>,
    /// Name of the package on the package index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pypi_name: Option<String>,
    /// URL of the build manifest (`setup.json`, `setup.cfg`, `pyproject.toml`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_info: Option<String>,
    /// URL of a Python module declaring `__version__`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_file: Option<String>,
    /// Explicit development status. Deprecated in favour of classifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_status: Option<String>,
    /// Prefix every framework entry point of the plugin must start with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    /// Importable package name. Defaults to the plugin name with `-` replaced by `_`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
}

impl PluginRegistration {
    /// Create a registration with only the source repository set.
    pub fn new(code_home: impl Into<String>) -> Self {
        Self {
            code_home: code_home.into(),
            ..Self::default()
        }
    }

    /// The importable package name for the plugin called `name`.
    pub fn package_name_for(&self, name: &str) -> String {
        self.package_name
            .clone()
            .unwrap_or_else(|| name.replace('-', "_"))
    }
}

/// Descriptive package metadata.
///
/// Every field is optional; sources only fill what they know.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PluginMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifiers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_page: Option<String>,
    /// Upload date of the current release, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl PluginMetadata {
    /// Set one of the manifest metadata keys by name.
    ///
    /// Returns false for keys outside [`METADATA_KEYS`](crate::constants::METADATA_KEYS).
    pub fn set(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "author" => &mut self.author,
            "author_email" => &mut self.author_email,
            "version" => &mut self.version,
            "description" => &mut self.description,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn classifiers(&self) -> &[String] {
        self.classifiers.as_deref().unwrap_or_default()
    }

    /// The version, if present and non-empty.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }
}

/// Data read from a build manifest.
///
/// A value is either fully empty (the manifest could not be used) or carries
/// at least an entry-point mapping, possibly empty. The constructors are the
/// only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceData {
    metadata: Option<PluginMetadata>,
    entry_points: Option<EntryPoints>,
    framework_version: Option<String>,
}

impl SourceData {
    /// Nothing could be read.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Only entry points were read.
    pub fn entry_points_only(entry_points: EntryPoints) -> Self {
        Self {
            metadata: None,
            entry_points: Some(entry_points),
            framework_version: None,
        }
    }

    pub fn full(
        metadata: PluginMetadata,
        entry_points: EntryPoints,
        framework_version: Option<String>,
    ) -> Self {
        Self {
            metadata: Some(metadata),
            entry_points: Some(entry_points),
            framework_version,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry_points.is_none()
    }

    pub fn metadata(&self) -> Option<&PluginMetadata> {
        self.metadata.as_ref()
    }

    pub fn entry_points(&self) -> Option<&EntryPoints> {
        self.entry_points.as_ref()
    }

    /// Compatible framework version constraint, e.g. `>=2.0,<3.0`.
    pub fn framework_version(&self) -> Option<&str> {
        self.framework_version.as_deref()
    }

    pub fn into_parts(self) -> (Option<PluginMetadata>, Option<EntryPoints>, Option<String>) {
        (self.metadata, self.entry_points, self.framework_version)
    }
}

/// Data read from the package index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexData {
    pub metadata: PluginMetadata,
    pub framework_version: Option<String>,
    /// Published artifact kinds (`sdist`, `bdist_wheel`, ...).
    pub build_types: BTreeSet<String>,
    /// Entry points, only when a built distribution was inspected.
    pub entry_points: Option<EntryPoints>,
    /// Whether the release declared any runtime dependencies.
    pub requires_dist_declared: bool,
}

/// The merged, validated record of one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPluginRecord {
    pub name: String,
    pub package_name: String,
    pub code_home: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pip_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pypi_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    /// Second-level domain of `code_home`, e.g. `github.com`.
    #[serde(default)]
    pub hosted_on: Option<String>,
    #[serde(default)]
    pub metadata: Option<PluginMetadata>,
    /// Compatible framework version constraint.
    #[serde(default)]
    pub aiida_version: Option<String>,
    #[serde(default)]
    pub entry_points: EntryPoints,
    pub development_status: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub pypi_builds: BTreeSet<String>,
    #[serde(default)]
    pub diagnostics: Diagnostics,
}

impl CanonicalPluginRecord {
    /// Start a record from a registration, before any data has been fetched.
    pub fn from_registration(name: &str, registration: &PluginRegistration) -> Self {
        Self {
            name: name.to_string(),
            package_name: registration.package_name_for(name),
            code_home: registration.code_home.clone(),
            pip_url: registration.pip_url.clone(),
            pypi_name: registration.pypi_name.clone(),
            plugin_info: registration.plugin_info.clone(),
            version_file: registration.version_file.clone(),
            entry_point_prefix: registration.entry_point_prefix.clone(),
            documentation_url: registration.documentation_url.clone(),
            hosted_on: None,
            metadata: None,
            aiida_version: None,
            entry_points: EntryPoints::new(),
            development_status: registration
                .development_status
                .clone()
                .unwrap_or_else(|| crate::DevelopmentStatus::default().to_string()),
            pypi_builds: BTreeSet::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// The resolved package version, if any source provided one.
    pub fn version(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(PluginMetadata::version)
    }
}

//! Loader for the plugin registry file.
//!
//! The registry maps plugin names to registrations and may be written in
//! YAML or JSON:
//!
//! ```yaml
//! crystal17:
//!   code_home: https://github.com/aiidaplugins/aiida-crystal17
//!   entry_point_prefix: crystal17
//!   pip_url: aiida-crystal17
//!   plugin_info: https://raw.githubusercontent.com/aiidaplugins/aiida-crystal17/master/setup.json
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::record::PluginRegistration;

/// Registered plugins keyed by name, iterated in name order.
pub type Registry = BTreeMap<String, PluginRegistration>;

/// Serialization of a registry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFormat {
    Yaml,
    Json,
}

impl RegistryFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse registry content in the given format.
pub fn parse_registry(content: &str, format: RegistryFormat) -> std::result::Result<Registry, String> {
    match format {
        RegistryFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        RegistryFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Load the registry file at `path`.
pub fn load_registry(path: &Path) -> Result<Registry> {
    if !path.exists() {
        return Err(Error::RegistryNotFound {
            path: path.to_path_buf(),
        });
    }
    let format = RegistryFormat::from_path(path).ok_or_else(|| Error::UnsupportedRegistryFormat {
        path: path.to_path_buf(),
    })?;
    let content = std::fs::read_to_string(path)?;
    let registry = parse_registry(&content, format).map_err(|message| Error::InvalidRegistry {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!(path = %path.display(), plugins = registry.len(), "Loaded registry");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            RegistryFormat::from_path(&PathBuf::from("plugins.yaml")),
            Some(RegistryFormat::Yaml)
        );
        assert_eq!(
            RegistryFormat::from_path(&PathBuf::from("plugins.YML")),
            Some(RegistryFormat::Yaml)
        );
        assert_eq!(
            RegistryFormat::from_path(&PathBuf::from("plugins.json")),
            Some(RegistryFormat::Json)
        );
        assert_eq!(RegistryFormat::from_path(&PathBuf::from("plugins.toml")), None);
    }

    #[test]
    fn test_parse_json_registry() {
        let registry = parse_registry(
            r#"{"b": {"code_home": "https://x/b"}, "a": {"code_home": "https://x/a", "pip_url": "a"}}"#,
            RegistryFormat::Json,
        )
        .unwrap();
        let names: Vec<&str> = registry.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry["a"].pip_url.as_deref(), Some("a"));
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let result = parse_registry("a:\n  code_home: x\n  colour: red\n", RegistryFormat::Yaml);
        assert!(result.is_err());
    }
}

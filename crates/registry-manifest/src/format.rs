//! Build-tool detection and dispatch to the format handlers

use std::fmt;

use registry_meta::{DiagnosticSink, SourceData};

use crate::error::Result;
use crate::handlers;

/// Build systems whose manifests can be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildTool {
    /// `pyproject.toml` with a PEP 621 `[project]` table
    Pep621,
    /// `pyproject.toml` managed by Poetry
    Poetry,
    /// `pyproject.toml` with Flit's old-style `[tool.flit.metadata]`
    FlitOld,
    /// setuptools `setup.cfg`
    SetuptoolsCfg,
    /// setuptools `setup.json`
    SetuptoolsJson,
}

impl BuildTool {
    /// Manifest file name the tool is recognized by.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Pep621 | Self::Poetry | Self::FlitOld => "pyproject.toml",
            Self::SetuptoolsCfg => "setup.cfg",
            Self::SetuptoolsJson => "setup.json",
        }
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pep621 => write!(f, "PEP 621"),
            Self::Poetry => write!(f, "Poetry"),
            Self::FlitOld => write!(f, "Flit"),
            Self::SetuptoolsCfg => write!(f, "setup.cfg"),
            Self::SetuptoolsJson => write!(f, "setup.json"),
        }
    }
}

/// How much of a manifest to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Metadata, entry points and framework version.
    #[default]
    Full,
    /// Entry points only, leaving metadata from other sources untouched.
    EntryPointsOnly,
}

impl ParseMode {
    pub fn entry_points_only(&self) -> bool {
        matches!(self, Self::EntryPointsOnly)
    }
}

/// Identify the build tool from the manifest URL and content.
///
/// Returns `None` (after reporting a warning) when the manifest is not
/// recognized or a `pyproject.toml` cannot be parsed.
pub fn identify_build_tool(url: &str, content: &str, sink: &mut dyn DiagnosticSink) -> Option<BuildTool> {
    if url.contains("pyproject.toml") {
        let doc = match content.parse::<toml::Table>() {
            Ok(doc) => doc,
            Err(e) => {
                sink.warn(format!("Unable to parse TOML: {e}"));
                return None;
            }
        };

        if doc.get("project").is_some_and(toml::Value::is_table) {
            return Some(BuildTool::Pep621);
        }

        let tool = doc.get("tool").and_then(toml::Value::as_table);
        if tool.is_some_and(|t| t.contains_key("poetry")) {
            return Some(BuildTool::Poetry);
        }
        if tool.is_some_and(|t| t.contains_key("flit")) {
            return Some(BuildTool::FlitOld);
        }

        sink.warn("Unknown build system in pyproject.toml".to_string());
        return None;
    }

    if url.contains("setup.cfg") {
        return Some(BuildTool::SetuptoolsCfg);
    }

    if url.contains("setup.json") {
        return Some(BuildTool::SetuptoolsJson);
    }

    sink.warn(format!("Unknown build system: {url}"));
    None
}

/// Parse manifest content with the handler of `tool`.
pub fn parse_build_file(
    tool: BuildTool,
    content: &str,
    mode: ParseMode,
    sink: &mut dyn DiagnosticSink,
) -> Result<SourceData> {
    tracing::debug!(%tool, ?mode, "Parsing build file");
    match tool {
        BuildTool::Pep621 => handlers::pep621::parse(content, mode, sink),
        BuildTool::Poetry => handlers::poetry::parse(content, mode, sink),
        BuildTool::FlitOld => handlers::flit::parse(content, mode, sink),
        BuildTool::SetuptoolsCfg => handlers::setup_cfg::parse(content, mode, sink),
        BuildTool::SetuptoolsJson => handlers::setup_json::parse(content, mode, sink),
    }
}

/// Identify and parse a manifest fetched from `url`.
///
/// An unrecognized manifest yields empty [`SourceData`]. Only contract
/// violations of a recognized format are returned as errors.
pub fn parse_manifest(
    url: &str,
    content: &str,
    mode: ParseMode,
    sink: &mut dyn DiagnosticSink,
) -> Result<SourceData> {
    match identify_build_tool(url, content, sink) {
        Some(tool) => parse_build_file(tool, content, mode, sink),
        None => Ok(SourceData::empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_meta::Diagnostics;
    use rstest::rstest;

    const BASE: &str = "https://raw.githubusercontent.com/org/repo/main";

    #[rstest]
    #[case("[project]\nname = \"x\"\n", Some(BuildTool::Pep621))]
    #[case("[tool.poetry]\nname = \"x\"\n", Some(BuildTool::Poetry))]
    #[case("[tool.flit.metadata]\nmodule = \"x\"\n", Some(BuildTool::FlitOld))]
    #[case("[project]\nname = \"x\"\n[tool.poetry]\nname = \"x\"\n", Some(BuildTool::Pep621))]
    #[case("[tool.black]\nline-length = 88\n", None)]
    #[case("[build-system]\nrequires = []\n", None)]
    fn test_identify_pyproject(#[case] content: &str, #[case] expected: Option<BuildTool>) {
        let mut diags = Diagnostics::default();
        let url = format!("{BASE}/pyproject.toml");
        assert_eq!(identify_build_tool(&url, content, &mut diags), expected);
        assert_eq!(diags.warnings.len(), usize::from(expected.is_none()));
    }

    #[test]
    fn test_identify_by_file_name() {
        let mut diags = Diagnostics::default();
        assert_eq!(
            identify_build_tool(&format!("{BASE}/setup.cfg"), "", &mut diags),
            Some(BuildTool::SetuptoolsCfg)
        );
        assert_eq!(
            identify_build_tool(&format!("{BASE}/setup.json"), "", &mut diags),
            Some(BuildTool::SetuptoolsJson)
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_identify_unknown_url_warns() {
        let mut diags = Diagnostics::default();
        assert_eq!(identify_build_tool(&format!("{BASE}/setup.py"), "", &mut diags), None);
        assert_eq!(diags.warnings.len(), 1);
        assert!(diags.warnings[0].contains("setup.py"));
    }

    #[test]
    fn test_identify_invalid_toml_warns() {
        let mut diags = Diagnostics::default();
        let result = identify_build_tool(&format!("{BASE}/pyproject.toml"), "[project", &mut diags);
        assert_eq!(result, None);
        assert!(diags.warnings[0].starts_with("Unable to parse TOML"));
    }

    #[test]
    fn test_parse_manifest_unidentified_is_empty() {
        let mut diags = Diagnostics::default();
        let data = parse_manifest("https://example.com/Makefile", "all:", ParseMode::Full, &mut diags)
            .unwrap();
        assert!(data.is_empty());
    }
}

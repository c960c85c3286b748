//! PEP 621 `pyproject.toml` handler

use registry_meta::constants::METADATA_KEYS;
use registry_meta::{DiagnosticSink, PluginMetadata, SourceData};

use super::{entry_points_from_toml, malformed, parse_toml, string_list, value_to_string};
use crate::constraint::framework_version_from_requirements;
use crate::error::Result;
use crate::format::ParseMode;

pub fn parse(content: &str, mode: ParseMode, sink: &mut dyn DiagnosticSink) -> Result<SourceData> {
    let Some(doc) = parse_toml(content, sink) else {
        return Ok(SourceData::empty());
    };
    let empty = toml::Table::new();
    let project = doc
        .get("project")
        .and_then(toml::Value::as_table)
        .unwrap_or(&empty);

    let entry_points = match entry_points_from_toml(project.get("entry-points")) {
        Ok(eps) => eps,
        Err(e) => return malformed(sink, format!("Unable to parse pyproject.toml: {e}")),
    };

    if mode.entry_points_only() {
        return Ok(SourceData::entry_points_only(entry_points));
    }

    let mut metadata = PluginMetadata::default();
    for key in METADATA_KEYS {
        if let Some(value) = project.get(*key).and_then(value_to_string) {
            metadata.set(key, value);
        }
    }
    metadata.classifiers = Some(string_list(project.get("classifiers")));

    let first_author = project
        .get("authors")
        .and_then(toml::Value::as_array)
        .and_then(|authors| authors.first())
        .and_then(toml::Value::as_table);
    if let Some(author) = first_author {
        if let Some(name) = author.get("name").and_then(value_to_string) {
            metadata.author = Some(name);
        }
        if let Some(email) = author.get("email").and_then(value_to_string) {
            metadata.author_email = Some(email);
        }
    }

    let requirements = string_list(project.get("dependencies"));
    let framework_version = framework_version_from_requirements(&requirements);

    Ok(SourceData::full(metadata, entry_points, framework_version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use registry_meta::Diagnostics;

    const PYPROJECT: &str = r#"
[project]
name = "aiida-diff"
version = "2.0.0"
description = "AiiDA demo plugin that wraps the `diff` executable"
authors = [{name = "The AiiDA Team", email = "developers@aiida.net"}]
classifiers = ["Framework :: AiiDA", "Development Status :: 3 - Alpha"]
dependencies = ["aiida-core>=2.0,<3", "voluptuous"]

[project.entry-points."aiida.calculations"]
"diff" = "aiida_diff.calculations:DiffCalculation"

[project.entry-points."aiida.parsers"]
"diff" = "aiida_diff.parsers:DiffParser"
"#;

    #[test]
    fn test_full_parse() {
        let mut diags = Diagnostics::default();
        let data = parse(PYPROJECT, ParseMode::Full, &mut diags).unwrap();

        let meta = data.metadata().unwrap();
        assert_eq!(meta.version(), Some("2.0.0"));
        assert_eq!(meta.author.as_deref(), Some("The AiiDA Team"));
        assert_eq!(meta.author_email.as_deref(), Some("developers@aiida.net"));
        assert_eq!(meta.classifiers().len(), 2);
        assert_eq!(data.framework_version(), Some(">=2.0,<3"));

        let eps = data.entry_points().unwrap();
        assert_eq!(
            eps["aiida.calculations"]["diff"],
            "aiida_diff.calculations:DiffCalculation"
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_entry_points_only() {
        let mut diags = Diagnostics::default();
        let full = parse(PYPROJECT, ParseMode::Full, &mut diags).unwrap();
        let only = parse(PYPROJECT, ParseMode::EntryPointsOnly, &mut diags).unwrap();

        assert!(only.metadata().is_none());
        assert!(only.framework_version().is_none());
        assert_eq!(only.entry_points(), full.entry_points());
    }

    #[test]
    fn test_minimal_project_has_empty_classifiers() {
        let mut diags = Diagnostics::default();
        let data = parse("[project]\nname = \"x\"\n", ParseMode::Full, &mut diags).unwrap();
        assert_eq!(data.metadata().unwrap().classifiers, Some(vec![]));
        assert_eq!(data.entry_points(), Some(&Default::default()));
        assert_eq!(data.framework_version(), None);
    }

    #[test]
    fn test_wrongly_shaped_entry_points_are_malformed() {
        let mut diags = Diagnostics::default();
        let content = "[project]\nentry-points = [\"a = b:c\"]\n";
        let data = parse(content, ParseMode::Full, &mut diags).unwrap();
        assert!(data.is_empty());
        assert_eq!(diags.warnings.len(), 1);
    }
}

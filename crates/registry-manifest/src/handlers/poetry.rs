//! Poetry `pyproject.toml` handler

use registry_meta::{DiagnosticSink, PluginMetadata, SourceData};

use super::{entry_points_from_toml, lookup, malformed, parse_toml, string_list, value_to_string};
use crate::constraint::framework_version_from_poetry;
use crate::error::{Error, Result};
use crate::format::{BuildTool, ParseMode};

const FORMAT: BuildTool = BuildTool::Poetry;

pub fn parse(content: &str, mode: ParseMode, sink: &mut dyn DiagnosticSink) -> Result<SourceData> {
    let Some(doc) = parse_toml(content, sink) else {
        return Ok(SourceData::empty());
    };
    let poetry = lookup(&doc, &["tool", "poetry"])
        .and_then(toml::Value::as_table)
        .ok_or_else(|| Error::missing(FORMAT, "tool.poetry"))?;

    let entry_points = match entry_points_from_toml(poetry.get("plugins")) {
        Ok(eps) => eps,
        Err(e) => return malformed(sink, format!("Unable to parse pyproject.toml: {e}")),
    };

    if mode.entry_points_only() {
        return Ok(SourceData::entry_points_only(entry_points));
    }

    let version = required_string(poetry, "version")?;
    let description = required_string(poetry, "description")?;
    let authors = poetry
        .get("authors")
        .ok_or_else(|| Error::missing(FORMAT, "authors"))?
        .as_array()
        .ok_or(Error::InvalidField {
            format: FORMAT,
            field: "authors".to_string(),
            expected: "an array of strings",
        })?;

    // Entries look like "Name <email>"
    let author = authors
        .iter()
        .filter_map(toml::Value::as_str)
        .map(|a| a.split('<').next().unwrap_or_default().trim())
        .collect::<Vec<_>>()
        .join(", ");

    let metadata = PluginMetadata {
        version: Some(version),
        description: Some(description),
        author: Some(author),
        classifiers: Some(string_list(poetry.get("classifiers"))),
        ..Default::default()
    };

    let framework_version = framework_version_from_poetry(poetry.get("dependencies"), sink);

    Ok(SourceData::full(metadata, entry_points, framework_version))
}

fn required_string(table: &toml::Table, field: &str) -> Result<String> {
    let value = table.get(field).ok_or_else(|| Error::missing(FORMAT, field))?;
    value_to_string(value).ok_or_else(|| Error::InvalidField {
        format: FORMAT,
        field: field.to_string(),
        expected: "a string",
    })
}

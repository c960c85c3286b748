//! Flit `pyproject.toml` handler for old-style `[tool.flit.metadata]`

use registry_meta::{DiagnosticSink, PluginMetadata, SourceData};

use super::{entry_points_from_toml, lookup, malformed, parse_toml, string_list, value_to_string};
use crate::constraint::framework_version_from_requirements;
use crate::error::{Error, Result};
use crate::format::{BuildTool, ParseMode};

const FORMAT: BuildTool = BuildTool::FlitOld;

pub fn parse(content: &str, mode: ParseMode, sink: &mut dyn DiagnosticSink) -> Result<SourceData> {
    let Some(doc) = parse_toml(content, sink) else {
        return Ok(SourceData::empty());
    };

    let entry_points = match entry_points_from_toml(lookup(&doc, &["tool", "flit", "entrypoints"])) {
        Ok(eps) => eps,
        Err(e) => return malformed(sink, format!("Unable to parse pyproject.toml: {e}")),
    };

    if mode.entry_points_only() {
        return Ok(SourceData::entry_points_only(entry_points));
    }

    // The version lives in the module's __version__ and the description in a
    // separate file, neither of which is part of this document.
    sink.warn(
        "version & description metadata are not (yet) parsed from the Flit buildsystem pyproject.toml"
            .to_string(),
    );

    let empty = toml::Table::new();
    let metadata_table = lookup(&doc, &["tool", "flit", "metadata"])
        .and_then(toml::Value::as_table)
        .unwrap_or(&empty);

    let author = metadata_table
        .get("author")
        .ok_or_else(|| Error::missing(FORMAT, "metadata.author"))?;
    let author = value_to_string(author).ok_or(Error::InvalidField {
        format: FORMAT,
        field: "metadata.author".to_string(),
        expected: "a string",
    })?;

    let metadata = PluginMetadata {
        author: Some(author),
        version: Some(String::new()),
        description: Some(String::new()),
        ..Default::default()
    };

    let requirements = string_list(metadata_table.get("requires"));
    let framework_version = framework_version_from_requirements(&requirements);

    Ok(SourceData::full(metadata, entry_points, framework_version))
}

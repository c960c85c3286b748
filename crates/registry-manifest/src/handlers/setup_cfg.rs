//! setuptools `setup.cfg` handler

use std::collections::BTreeMap;

use registry_meta::constants::METADATA_KEYS;
use registry_meta::{DiagnosticSink, EntryPoints, PluginMetadata, SourceData};

use super::{malformed, split_entry_point};
use crate::constraint::framework_version_from_requirements;
use crate::error::Result;
use crate::format::ParseMode;
use crate::ini::{IniDocument, KeyCase};

pub fn parse(content: &str, mode: ParseMode, sink: &mut dyn DiagnosticSink) -> Result<SourceData> {
    let doc = match IniDocument::parse(content, KeyCase::Insensitive) {
        Ok(doc) => doc,
        Err(e) => return malformed(sink, format!("Unable to parse setup.cfg: {e}")),
    };

    let mut entry_points = EntryPoints::new();
    if let Some(section) = doc.section("options.entry_points") {
        for (group, value) in section.entries() {
            let mut targets = BTreeMap::new();
            for line in value_lines(value) {
                let Some((name, target)) = split_entry_point(line) else {
                    return malformed(
                        sink,
                        format!("Unable to parse setup.cfg: entry point '{line}' in group '{group}' has no '='"),
                    );
                };
                targets.insert(name, target);
            }
            entry_points.insert(group.to_string(), targets);
        }
    }

    if mode.entry_points_only() {
        return Ok(SourceData::entry_points_only(entry_points));
    }

    let mut metadata = PluginMetadata::default();
    for key in METADATA_KEYS {
        if let Some(value) = doc.get("metadata", key) {
            metadata.set(key, value.to_string());
        }
    }
    if let Some(classifiers) = doc.get("metadata", "classifiers") {
        metadata.classifiers = Some(value_lines(classifiers).map(str::to_string).collect());
    }

    let requirements: Vec<String> = doc
        .get("options", "install_requires")
        .map(|v| value_lines(v).map(str::to_string).collect())
        .unwrap_or_default();
    let framework_version = framework_version_from_requirements(&requirements);

    Ok(SourceData::full(metadata, entry_points, framework_version))
}

/// Non-empty, non-comment lines of a multi-line value.
fn value_lines(value: &str) -> impl Iterator<Item = &str> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

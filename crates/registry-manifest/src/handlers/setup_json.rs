//! setuptools `setup.json` handler
//!
//! Entry points are stored as `{group: ["name = target", ...]}`. Groups that
//! are already `{name: target}` objects are accepted as well.

use std::collections::BTreeMap;

use serde_json::Value;

use registry_meta::constants::METADATA_KEYS;
use registry_meta::{DiagnosticSink, EntryPoints, PluginMetadata, SourceData};

use super::{malformed, split_entry_point};
use crate::constraint::framework_version_from_requirements;
use crate::error::Result;
use crate::format::ParseMode;

pub fn parse(content: &str, mode: ParseMode, sink: &mut dyn DiagnosticSink) -> Result<SourceData> {
    let doc: Value = match serde_json::from_str(content) {
        Ok(doc) => doc,
        Err(e) => return malformed(sink, format!("Unable to parse JSON: {e}")),
    };
    let Some(doc) = doc.as_object() else {
        return malformed(sink, "Unable to parse JSON: setup.json must be an object".to_string());
    };

    let entry_points = match entry_points(doc.get("entry_points")) {
        Ok(eps) => eps,
        Err(e) => return malformed(sink, format!("Unable to parse setup.json: {e}")),
    };

    if mode.entry_points_only() {
        return Ok(SourceData::entry_points_only(entry_points));
    }

    let mut metadata = PluginMetadata::default();
    for key in METADATA_KEYS {
        let value = doc.get(*key).map(json_to_string).unwrap_or_default();
        metadata.set(key, value);
    }
    metadata.classifiers = Some(string_list(doc.get("classifiers")));

    let requirements = string_list(doc.get("install_requires"));
    let framework_version = framework_version_from_requirements(&requirements);

    Ok(SourceData::full(metadata, entry_points, framework_version))
}

fn entry_points(value: Option<&Value>) -> std::result::Result<EntryPoints, String> {
    let Some(value) = value else {
        return Ok(EntryPoints::new());
    };
    let groups = value
        .as_object()
        .ok_or_else(|| "entry_points must be an object".to_string())?;

    let mut entry_points = EntryPoints::new();
    for (group, members) in groups {
        let mut targets = BTreeMap::new();
        match members {
            Value::Array(lines) => {
                for line in lines {
                    let line = line
                        .as_str()
                        .ok_or_else(|| format!("entry point in group '{group}' must be a string"))?;
                    let (name, target) = split_entry_point(line)
                        .ok_or_else(|| format!("entry point '{line}' in group '{group}' has no '='"))?;
                    targets.insert(name, target);
                }
            }
            Value::Object(map) => {
                for (name, target) in map {
                    let target = target
                        .as_str()
                        .ok_or_else(|| format!("entry point '{group}.{name}' must be a string"))?;
                    targets.insert(name.clone(), target.to_string());
                }
            }
            _ => return Err(format!("entry point group '{group}' must be a list")),
        }
        entry_points.insert(group.clone(), targets);
    }
    Ok(entry_points)
}

fn json_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use registry_meta::Diagnostics;

    const SETUP_JSON: &str = r#"{
    "name": "aiida-crystal17",
    "version": "0.11.0",
    "author": "Chris Sewell",
    "author_email": "chrisj_sewell@hotmail.com",
    "description": "AiiDA plugin for running the CRYSTAL17 code",
    "classifiers": ["Framework :: AiiDA", "Development Status :: 4 - Beta"],
    "install_requires": ["aiida-core>=1.1.0,<2.0.0", "ase>=3.12.0,<4.0.0"],
    "entry_points": {
        "aiida.calculations": [
            "crystal17.basic = aiida_crystal17.calculations.cry_basic:CryBasicCalculation",
            "crystal17.main=aiida_crystal17.calculations.cry_main:CryMainCalculation"
        ],
        "gulp.potentials": [
            "reaxff = aiida_crystal17.gulp.potentials.raw_reaxff:PotentialWriterReaxff"
        ]
    }
}"#;

    #[test]
    fn test_full_parse() {
        let mut diags = Diagnostics::default();
        let data = parse(SETUP_JSON, ParseMode::Full, &mut diags).unwrap();
        let meta = data.metadata().unwrap();

        assert_eq!(meta.version(), Some("0.11.0"));
        assert_eq!(meta.author_email.as_deref(), Some("chrisj_sewell@hotmail.com"));
        assert_eq!(data.framework_version(), Some(">=1.1.0,<2.0.0"));

        let eps = data.entry_points().unwrap();
        assert_eq!(
            eps["aiida.calculations"]["crystal17.main"],
            "aiida_crystal17.calculations.cry_main:CryMainCalculation"
        );
        assert_eq!(
            eps["gulp.potentials"]["reaxff"],
            "aiida_crystal17.gulp.potentials.raw_reaxff:PotentialWriterReaxff"
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_missing_metadata_defaults_to_empty_strings() {
        let mut diags = Diagnostics::default();
        let data = parse("{}", ParseMode::Full, &mut diags).unwrap();
        let meta = data.metadata().unwrap();
        assert_eq!(meta.author.as_deref(), Some(""));
        assert_eq!(meta.version.as_deref(), Some(""));
        assert_eq!(meta.classifiers, Some(vec![]));
        assert_eq!(data.framework_version(), None);
    }

    #[test]
    fn test_object_groups_accepted() {
        let mut diags = Diagnostics::default();
        let content = r#"{"entry_points": {"aiida.parsers": {"x": "mod:X"}}}"#;
        let data = parse(content, ParseMode::EntryPointsOnly, &mut diags).unwrap();
        assert_eq!(data.entry_points().unwrap()["aiida.parsers"]["x"], "mod:X");
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let mut diags = Diagnostics::default();
        let data = parse("{not json", ParseMode::Full, &mut diags).unwrap();
        assert!(data.is_empty());
        assert!(diags.warnings[0].starts_with("Unable to parse JSON"));
    }

    #[test]
    fn test_entry_point_without_equals_is_malformed() {
        let mut diags = Diagnostics::default();
        let content = r#"{"entry_points": {"aiida.parsers": ["broken"]}}"#;
        let data = parse(content, ParseMode::Full, &mut diags).unwrap();
        assert!(data.is_empty());
        assert_eq!(diags.warnings.len(), 1);
    }
}

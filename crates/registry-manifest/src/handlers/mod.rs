//! Manifest handlers, one per build tool.
//!
//! Each handler exposes `parse(content, mode, sink) -> Result<SourceData>`.
//! Malformed input is reported through the sink and yields
//! [`SourceData::empty`]; only violations of a format's mandatory fields
//! are returned as errors.

pub mod flit;
pub mod pep621;
pub mod poetry;
pub mod setup_cfg;
pub mod setup_json;

use std::collections::BTreeMap;

use registry_meta::{DiagnosticSink, EntryPoints, SourceData};

use crate::error::Result;

/// Split an entry-point line `name = target` on the first `=`.
///
/// Both sides are trimmed. Returns `None` when the line has no `=`.
///
/// ```
/// use registry_manifest::handlers::split_entry_point;
///
/// assert_eq!(
///     split_entry_point("foo.bar = mymod:MyClass"),
///     Some(("foo.bar".to_string(), "mymod:MyClass".to_string()))
/// );
/// ```
pub fn split_entry_point(line: &str) -> Option<(String, String)> {
    let (name, target) = line.split_once('=')?;
    Some((name.trim().to_string(), target.trim().to_string()))
}

/// Parse TOML, reporting syntax errors as a warning.
pub(crate) fn parse_toml(content: &str, sink: &mut dyn DiagnosticSink) -> Option<toml::Table> {
    match content.parse::<toml::Table>() {
        Ok(table) => Some(table),
        Err(e) => {
            sink.warn(format!("Unable to parse TOML: {e}"));
            None
        }
    }
}

/// Follow a dotted path of table keys.
pub(crate) fn lookup<'a>(table: &'a toml::Table, path: &[&str]) -> Option<&'a toml::Value> {
    let (first, rest) = path.split_first()?;
    let mut current = table.get(*first)?;
    for key in rest {
        current = current.as_table()?.get(*key)?;
    }
    Some(current)
}

/// Read a `{group: {name: target}}` table.
///
/// An absent table is an empty mapping. Returns `Err` with a description
/// of the offending entry when the shape is wrong.
pub(crate) fn entry_points_from_toml(
    value: Option<&toml::Value>,
) -> std::result::Result<EntryPoints, String> {
    let Some(value) = value else {
        return Ok(EntryPoints::new());
    };
    let groups = value
        .as_table()
        .ok_or_else(|| "entry points must be a table of groups".to_string())?;

    let mut entry_points = EntryPoints::new();
    for (group, members) in groups {
        let members = members
            .as_table()
            .ok_or_else(|| format!("entry point group '{group}' must be a table"))?;
        let mut targets = BTreeMap::new();
        for (name, target) in members {
            let target = target
                .as_str()
                .ok_or_else(|| format!("entry point '{group}.{name}' must be a string"))?;
            targets.insert(name.clone(), target.to_string());
        }
        entry_points.insert(group.clone(), targets);
    }
    Ok(entry_points)
}

/// Collect the string entries of a TOML array; anything else is empty.
pub(crate) fn string_list(value: Option<&toml::Value>) -> Vec<String> {
    value
        .and_then(toml::Value::as_array)
        .map(|items| items.iter().filter_map(value_to_string).collect())
        .unwrap_or_default()
}

/// Render a scalar TOML value as a string.
pub(crate) fn value_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Report a malformed document and give up on it.
pub(crate) fn malformed(sink: &mut dyn DiagnosticSink, message: String) -> Result<SourceData> {
    sink.warn(message);
    Ok(SourceData::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foo.bar = mymod:MyClass", "foo.bar", "mymod:MyClass")]
    #[case("foo=mod:f", "foo", "mod:f")]
    #[case("  spaced   =   mod.sub:Obj  ", "spaced", "mod.sub:Obj")]
    #[case("name = mod:f [extra]", "name", "mod:f [extra]")]
    #[case("a = b = c", "a", "b = c")]
    fn test_split_entry_point(#[case] line: &str, #[case] name: &str, #[case] target: &str) {
        assert_eq!(
            split_entry_point(line),
            Some((name.to_string(), target.to_string()))
        );
    }

    #[test]
    fn test_split_entry_point_without_equals() {
        assert_eq!(split_entry_point("just-a-name"), None);
    }

    #[test]
    fn test_entry_points_from_toml_shape_errors() {
        let doc: toml::Table = "eps = { group = \"not a table\" }".parse().unwrap();
        let err = entry_points_from_toml(doc.get("eps")).unwrap_err();
        assert!(err.contains("group"));

        assert_eq!(entry_points_from_toml(None).unwrap(), EntryPoints::new());
    }

    #[test]
    fn test_lookup_nested() {
        let doc: toml::Table = "[tool.poetry]\nversion = \"1.0\"\n".parse().unwrap();
        assert_eq!(
            lookup(&doc, &["tool", "poetry", "version"]).and_then(toml::Value::as_str),
            Some("1.0")
        );
        assert!(lookup(&doc, &["tool", "flit"]).is_none());
    }
}

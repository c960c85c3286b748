//! Canonicalization of Poetry version ranges to PEP 440 specifiers.
//!
//! | Poetry      | canonical           |
//! |-------------|---------------------|
//! | `^1.2`      | `>=1.2,<2.0`        |
//! | `^0.2.3`    | `>=0.2.3,<0.3.0`    |
//! | `~1.2.3`    | `>=1.2.3,<1.3.0`    |
//! | `~=1.2`     | `>=1.2,<2.0`        |
//! | `1.2.*`     | `>=1.2,<1.3`        |
//! | `1.2.3`     | `1.2.3`             |
//! | `>=1.0 <2`  | `>=1.0,<2`          |
//! | `^1 \|\| ^2`| `>=1,<2 \|\| >=2,<3`|
//!
//! Upper bounds keep the number of release components of the written
//! version; pre-release suffixes are dropped from them.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)*)([.-]?[A-Za-z][A-Za-z0-9.+-]*)?$").unwrap()
});

static OPERATOR_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(>=|<=|!=|==|~=|[<>=^~])\s+").unwrap());

/// Canonicalize a Poetry range expression.
///
/// ```
/// use registry_manifest::range::canonicalize_range;
///
/// assert_eq!(canonicalize_range("^1.2").unwrap(), ">=1.2,<2.0");
/// assert!(canonicalize_range("^one").is_err());
/// ```
pub fn canonicalize_range(range: &str) -> Result<String> {
    let unions = range
        .split("||")
        .map(|union| canonicalize_union(range, union))
        .collect::<Result<Vec<_>>>()?;
    Ok(unions.join(" || "))
}

fn canonicalize_union(range: &str, union: &str) -> Result<String> {
    let compact = OPERATOR_SPACE.replace_all(union.trim(), "$1");
    let clauses: Vec<&str> = compact
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|c| !c.is_empty())
        .collect();
    if clauses.is_empty() {
        return Err(Error::range(range, "empty constraint"));
    }

    let mut bounds = Vec::new();
    for clause in clauses {
        bounds.extend(canonicalize_clause(range, clause)?);
    }
    Ok(bounds.join(","))
}

fn canonicalize_clause(range: &str, clause: &str) -> Result<Vec<String>> {
    if clause == "*" {
        return Ok(vec!["*".to_string()]);
    }

    if let Some(version) = clause.strip_prefix('^') {
        let release = parse_version(range, version)?;
        let index = match release.as_slice() {
            [major, ..] if *major != 0 => 0,
            [_] => 0,
            [_, minor, ..] if *minor != 0 => 1,
            [_, _] => 1,
            _ => 2,
        };
        return Ok(vec![format!(">={version}"), format!("<{}", bump(range, &release, index)?)]);
    }

    if let Some(version) = clause.strip_prefix("~=") {
        let release = parse_version(range, version)?;
        if release.len() < 2 {
            return Err(Error::range(range, "'~=' needs at least two release components"));
        }
        let upper = bump(range, &release, release.len() - 2)?;
        return Ok(vec![format!(">={version}"), format!("<{upper}")]);
    }

    if let Some(version) = clause.strip_prefix('~') {
        let release = parse_version(range, version)?;
        let index = if release.len() == 1 { 0 } else { 1 };
        return Ok(vec![format!(">={version}"), format!("<{}", bump(range, &release, index)?)]);
    }

    for op in [">=", "<=", "!=", ">", "<"] {
        if let Some(version) = clause.strip_prefix(op) {
            if op == "!=" && version.ends_with(".*") {
                parse_version(range, &version[..version.len() - 2])?;
            } else {
                parse_version(range, version)?;
            }
            return Ok(vec![format!("{op}{version}")]);
        }
    }

    let version = clause
        .strip_prefix("==")
        .or_else(|| clause.strip_prefix('='))
        .unwrap_or(clause);

    if let Some(prefix) = version.strip_suffix(".*") {
        let release = parse_version(range, prefix)?;
        if release.len() != prefix.split('.').count() {
            return Err(Error::range(range, "wildcards apply to release components only"));
        }
        let upper = bump(range, &release, release.len() - 1)?;
        return Ok(vec![format!(">={prefix}"), format!("<{upper}")]);
    }

    parse_version(range, version)?;
    Ok(vec![version.to_string()])
}

/// Release components of `version`, e.g. `[1, 2, 3]` for `1.2.3rc1`.
fn parse_version(range: &str, version: &str) -> Result<Vec<u64>> {
    let caps = VERSION
        .captures(version)
        .ok_or_else(|| Error::range(range, format!("invalid version '{version}'")))?;
    caps[1]
        .split('.')
        .map(|part| {
            part.parse::<u64>()
                .map_err(|e| Error::range(range, format!("invalid version '{version}': {e}")))
        })
        .collect()
}

/// Increment the component at `index` and zero the ones after it.
fn bump(range: &str, release: &[u64], index: usize) -> Result<String> {
    let parts = release
        .iter()
        .enumerate()
        .map(|(i, part)| match i.cmp(&index) {
            std::cmp::Ordering::Less => Ok(part.to_string()),
            std::cmp::Ordering::Equal => part
                .checked_add(1)
                .map(|next| next.to_string())
                .ok_or_else(|| Error::range(range, format!("version component {part} is too large"))),
            std::cmp::Ordering::Greater => Ok("0".to_string()),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("^1.2", ">=1.2,<2.0")]
    #[case("^1.2.3", ">=1.2.3,<2.0.0")]
    #[case("^1", ">=1,<2")]
    #[case("^0.2.3", ">=0.2.3,<0.3.0")]
    #[case("^0.0.3", ">=0.0.3,<0.0.4")]
    #[case("^0.0", ">=0.0,<0.1")]
    #[case("^2.0.0b1", ">=2.0.0b1,<3.0.0")]
    #[case("~1.2.3", ">=1.2.3,<1.3.0")]
    #[case("~1.2", ">=1.2,<1.3")]
    #[case("~1", ">=1,<2")]
    #[case("~=1.2", ">=1.2,<2.0")]
    #[case("~=1.2.3", ">=1.2.3,<1.3.0")]
    #[case("1.2.*", ">=1.2,<1.3")]
    #[case("==1.*", ">=1,<2")]
    #[case("*", "*")]
    #[case("1.2.3", "1.2.3")]
    #[case("==1.2.3", "1.2.3")]
    #[case(">=1.0,<2.0", ">=1.0,<2.0")]
    #[case(">= 1.0, < 2.0", ">=1.0,<2.0")]
    #[case(">=1.0 <2.0", ">=1.0,<2.0")]
    #[case("!=1.5.*", "!=1.5.*")]
    #[case("^1.6 || ^2.0", ">=1.6,<2.0 || >=2.0,<3.0")]
    fn test_canonicalize(#[case] range: &str, #[case] expected: &str) {
        assert_eq!(canonicalize_range(range).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("^")]
    #[case("^^2")]
    #[case("not a version")]
    #[case("~=1")]
    #[case(">=x.y")]
    #[case("1.*.3")]
    #[case("^1.2 ||")]
    #[case("^18446744073709551615")]
    #[case("~=18446744073709551615.0")]
    #[case("18446744073709551615.*")]
    fn test_invalid(#[case] range: &str) {
        assert!(canonicalize_range(range).is_err(), "{range:?} should be rejected");
    }

    proptest! {
        #[test]
        fn test_caret_upper_bound_keeps_precision(
            parts in proptest::collection::vec(0u64..50, 1..4)
        ) {
            let version = parts.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
            let canonical = canonicalize_range(&format!("^{version}")).unwrap();
            let (_, upper) = canonical.split_once(",<").unwrap();
            prop_assert_eq!(upper.split('.').count(), parts.len());
        }
    }
}

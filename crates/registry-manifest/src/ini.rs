//! Reader for INI documents as written by setuptools and wheel builders.
//!
//! Follows the syntax of Python's `configparser`, which both `setup.cfg`
//! and `entry_points.txt` are written for:
//!
//! - `[section]` headers; an option before any header is an error
//! - `key = value` or `key: value`, split on the first delimiter
//! - lines indented deeper than their option line continue its value
//! - full-line comments start with `#` or `;`
//! - blank lines inside a multi-line value are kept, trailing ones dropped
//! - duplicate sections and duplicate options within a section are errors
//!
//! Inline comments and interpolation are not supported. `DEFAULT` is read
//! as an ordinary section.

use crate::error::{Error, Result};

/// How option names are compared and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyCase {
    /// Option names are lowercased (`setup.cfg`).
    #[default]
    Insensitive,
    /// Option names are kept as written (`entry_points.txt`).
    Sensitive,
}

impl KeyCase {
    fn apply(&self, key: &str) -> String {
        match self {
            Self::Insensitive => key.to_lowercase(),
            Self::Sensitive => key.to_string(),
        }
    }
}

/// One `[section]` with its options in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A parsed INI document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IniDocument {
    key_case: KeyCase,
    sections: Vec<IniSection>,
}

/// Option being read, with its value lines.
struct Pending {
    key: String,
    lines: Vec<String>,
}

impl IniDocument {
    /// Parse `content`.
    pub fn parse(content: &str, key_case: KeyCase) -> Result<Self> {
        let mut doc = Self {
            key_case,
            sections: Vec::new(),
        };
        let mut current: Option<(String, Vec<Pending>)> = None;
        let mut indent_level = 0usize;

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let value = raw.trim();

            if value.starts_with('#') || value.starts_with(';') {
                continue;
            }

            if value.is_empty() {
                // Kept for a multi-line value; dropped again if nothing follows.
                if let Some(last) = current.as_mut().and_then(|(_, options)| options.last_mut()) {
                    last.lines.push(String::new());
                }
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();
            let continues = current
                .as_ref()
                .is_some_and(|(_, options)| !options.is_empty())
                && indent > indent_level;

            if continues {
                if let Some(last) = current.as_mut().and_then(|(_, options)| options.last_mut()) {
                    last.lines.push(value.to_string());
                }
                continue;
            }

            indent_level = indent;

            if let Some(header) = section_header(value) {
                if let Some((name, options)) = current.take() {
                    doc.push_section(name, options);
                }
                if doc.section(header).is_some() {
                    return Err(Error::ini(line_no, format!("duplicate section '{header}'")));
                }
                current = Some((header.to_string(), Vec::new()));
                continue;
            }

            let Some((name, options)) = current.as_mut() else {
                return Err(Error::ini(line_no, "option outside of any section"));
            };

            let delimiter = value
                .find(['=', ':'])
                .ok_or_else(|| Error::ini(line_no, format!("expected 'key = value', got '{value}'")))?;
            let key = key_case.apply(value[..delimiter].trim());
            if key.is_empty() {
                return Err(Error::ini(line_no, "option with an empty name"));
            }
            if options.iter().any(|p| p.key == key) {
                return Err(Error::ini(
                    line_no,
                    format!("duplicate option '{key}' in section '{name}'"),
                ));
            }
            options.push(Pending {
                key,
                lines: vec![value[delimiter + 1..].trim().to_string()],
            });
        }

        if let Some((name, options)) = current {
            doc.push_section(name, options);
        }
        Ok(doc)
    }

    fn push_section(&mut self, name: String, options: Vec<Pending>) {
        let entries = options
            .into_iter()
            .map(|p| (p.key, p.lines.join("\n").trim_end().to_string()))
            .collect();
        self.sections.push(IniSection { name, entries });
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &IniSection> {
        self.sections.iter()
    }

    /// Value of `key` in `section`. The key is matched with the document's
    /// [`KeyCase`].
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(&self.key_case.apply(key))
    }
}

fn section_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    let header = &rest[..end];
    (!header.is_empty()).then_some(header)
}

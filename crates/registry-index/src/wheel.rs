//! Entry points recorded in built distributions.
//!
//! A wheel is a zip archive whose `<name>-<version>.dist-info/entry_points.txt`
//! lists the entry points as an INI document: sections are groups, options
//! map entry-point names to targets. Names are case-sensitive.

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use registry_manifest::{IniDocument, KeyCase};
use registry_meta::EntryPoints;

use crate::error::{Error, Result};

const ENTRY_POINTS_MEMBER: &str = ".dist-info/entry_points.txt";

/// Read the entry points of the wheel in `reader`.
pub fn read_entry_points<R: Read + Seek>(reader: R) -> Result<EntryPoints> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let mut content = None;
    for index in 0..archive.len() {
        let mut member = archive.by_index(index)?;
        if member.name().ends_with(ENTRY_POINTS_MEMBER) {
            let mut text = String::new();
            member.read_to_string(&mut text)?;
            content = Some(text);
            break;
        }
    }
    let content = content.ok_or(Error::MissingEntryPoints)?;

    parse_entry_points(&content)
}

/// Parse the content of an `entry_points.txt`.
pub fn parse_entry_points(content: &str) -> Result<EntryPoints> {
    let doc = IniDocument::parse(content, KeyCase::Sensitive)?;
    Ok(doc
        .sections()
        .filter(|section| section.name() != "DEFAULT")
        .map(|section| {
            let targets: BTreeMap<String, String> = section
                .entries()
                .map(|(name, target)| (name.to_string(), target.to_string()))
                .collect();
            (section.name().to_string(), targets)
        })
        .collect())
}

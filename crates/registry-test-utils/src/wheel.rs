//! In-memory wheel archives.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Build a wheel for `dist_info` (e.g. `aiida_diff-1.2.0`) whose
/// `entry_points.txt` has the given content.
pub fn build_wheel(dist_info: &str, entry_points: &str) -> Vec<u8> {
    build_archive(&[
        (
            format!("{dist_info}.dist-info/METADATA"),
            "Metadata-Version: 2.1\n".to_string(),
        ),
        (
            format!("{dist_info}.dist-info/entry_points.txt"),
            entry_points.to_string(),
        ),
    ])
}

/// Build a wheel that declares no entry points.
pub fn build_wheel_without_entry_points(dist_info: &str) -> Vec<u8> {
    build_archive(&[(
        format!("{dist_info}.dist-info/METADATA"),
        "Metadata-Version: 2.1\n".to_string(),
    )])
}

fn build_archive(members: &[(String, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in members {
        writer
            .start_file(name.as_str(), SimpleFileOptions::default())
            .expect("build_archive: failed to start zip member");
        writer
            .write_all(content.as_bytes())
            .expect("build_archive: failed to write zip member");
    }
    writer
        .finish()
        .expect("build_archive: failed to finish zip archive")
        .into_inner()
}

//! Atomic writing of the run output.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::error::{Error, Result};
use crate::run::RunOutput;

/// Serialize `output` as pretty JSON and write it to `path` atomically.
///
/// The document is written to a temporary sibling file under an exclusive
/// lock and renamed over `path`, so readers see either the previous run or
/// this one.
pub fn write_output(path: &Path, output: &RunOutput) -> Result<()> {
    let mut content = serde_json::to_vec_pretty(output)?;
    content.push(b'\n');
    write_atomic(path, &content)?;
    tracing::info!(path = %path.display(), plugins = output.plugins.len(), "Wrote run output");
    Ok(())
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = persist(&mut temp_file, &temp_path, path, content);
    if written.is_err() {
        drop(temp_file);
        if let Err(e) = fs::remove_file(&temp_path) {
            tracing::warn!(
                path = %temp_path.display(),
                error = %e,
                "Failed to remove temporary output"
            );
        }
    }
    written
}

fn persist(temp_file: &mut File, temp_path: &Path, path: &Path, content: &[u8]) -> Result<()> {
    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    fs::rename(temp_path, path).map_err(|e| Error::io(path, e))
}

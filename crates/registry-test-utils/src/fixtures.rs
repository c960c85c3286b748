//! Paths into the workspace `test-fixtures/` directory.

use std::fs;
use std::path::PathBuf;

/// Path to the test-fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    // crates/registry-test-utils -> ../../test-fixtures
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures")
}

/// Content of `test-fixtures/manifests/<name>`.
///
/// # Panics
/// Panics with the path if the fixture cannot be read.
pub fn manifest_fixture(name: &str) -> String {
    read(fixtures_dir().join("manifests").join(name))
}

/// Path of `test-fixtures/registry/<name>`.
pub fn registry_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("registry").join(name)
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture at {}: {}", path.display(), e))
}

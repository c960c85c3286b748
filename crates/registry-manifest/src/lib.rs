//! Build-manifest parsing for the plugin registry.
//!
//! Plugins describe themselves in one of several build-system manifests.
//! This crate identifies which one a file is, normalizes it into a
//! [`SourceData`](registry_meta::SourceData) record, and resolves the
//! compatible framework version from the declared dependencies.
//!
//! Supported manifests:
//!
//! - `pyproject.toml` with a PEP 621 `[project]` table
//! - `pyproject.toml` for Poetry (`[tool.poetry]`)
//! - `pyproject.toml` for Flit with old-style metadata (`[tool.flit]`)
//! - `setup.cfg` (setuptools, INI)
//! - `setup.json` (setuptools, JSON)

pub mod constraint;
pub mod error;
pub mod format;
pub mod handlers;
pub mod ini;
pub mod module;
pub mod range;
pub mod requirement;

pub use constraint::{framework_version_from_poetry, framework_version_from_requirements};
pub use error::{Error, Result};
pub use format::{BuildTool, ParseMode, identify_build_tool, parse_build_file, parse_manifest};
pub use ini::{IniDocument, KeyCase};
pub use module::version_from_module;
pub use requirement::{Operator, Requirement, Specifier};

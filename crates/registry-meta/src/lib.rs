//! Data model, configuration and diagnostics for the plugin registry.
//!
//! This crate holds the types shared by every stage of a registry run:
//! the registrations read from the registry file, the intermediate records
//! produced by the manifest parsers and the package-index client, the
//! canonical record written at the end of a run, and the [`Reporter`] that
//! collects per-plugin diagnostics.

pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod record;
pub mod report;
pub mod status;

pub use config::RegistryConfig;
pub use error::{Error, Result};
pub use loader::{Registry, load_registry, parse_registry};
pub use record::{
    CanonicalPluginRecord, EntryPoints, IndexData, PluginMetadata, PluginRegistration, SourceData,
};
pub use report::{DiagnosticSink, Diagnostics, Finding, Reporter, Scope, Severity};
pub use status::DevelopmentStatus;

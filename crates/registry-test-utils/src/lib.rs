//! Shared test utilities for the plugin registry workspace.
//!
//! Registry runs talk to the package index, to source repositories and to
//! documentation sites. These helpers replace all of that with canned
//! responses. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`fetcher`]: [`StubFetcher`] serving canned documents by URL
//! - [`index`]: [`IndexRecord`] builder for package-index JSON records
//! - [`wheel`]: in-memory wheel archives
//! - [`fixtures`]: paths into the workspace `test-fixtures/` directory

pub mod fetcher;
pub mod fixtures;
pub mod index;
pub mod wheel;

pub use fetcher::StubFetcher;
pub use index::IndexRecord;

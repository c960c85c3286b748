//! Package-index access for the plugin registry.
//!
//! [`IndexClient`] reads a plugin's release record from a PyPI-compatible
//! JSON API and, when a built distribution is published, recovers the
//! plugin's entry points from the wheel. All network access goes through
//! the [`Fetch`] trait so that runs can be driven without a network.

pub mod client;
pub mod error;
pub mod fetch;
pub mod wheel;

pub use client::IndexClient;
pub use error::{Error, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use wheel::read_entry_points;

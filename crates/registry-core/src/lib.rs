//! Core of a plugin registry run.
//!
//! For every registered plugin the [`Reconciler`] merges what the package
//! index and the plugin's build manifest declare into one
//! [`CanonicalPluginRecord`](registry_meta::CanonicalPluginRecord), and
//! [`validate`] checks it against the framework's plugin conventions.
//! [`run`] drives a whole registry and [`write_output`] stores the result.

pub mod error;
pub mod hosted;
pub mod install;
pub mod output;
pub mod reconcile;
pub mod run;
pub mod validate;

pub use error::{Error, Result};
pub use hosted::hosted_on;
pub use install::pip_install_command;
pub use output::write_output;
pub use reconcile::Reconciler;
pub use run::{RunOutput, run};

//! Merge of registration, index and manifest data into one record.

use registry_index::{Fetch, IndexClient};
use registry_manifest::{ParseMode, parse_manifest, version_from_module};
use registry_meta::constants::CORE_PACKAGE;
use registry_meta::{
    CanonicalPluginRecord, DiagnosticSink, PluginMetadata, PluginRegistration, RegistryConfig,
    SourceData,
};

use crate::error::Result;
use crate::hosted::hosted_on;
use crate::validate::{ValidationContext, validate};

/// Completes registrations into canonical records.
///
/// The index is consulted first. The build manifest fills in what the index
/// could not provide: only entry points when the index answered, everything
/// otherwise.
pub struct Reconciler<'f> {
    fetcher: &'f dyn Fetch,
    index: IndexClient<'f>,
}

impl<'f> Reconciler<'f> {
    pub fn new(fetcher: &'f dyn Fetch, config: &RegistryConfig) -> Self {
        Self {
            fetcher,
            index: IndexClient::new(fetcher, &config.index),
        }
    }

    /// Build and validate the record of the plugin `name`.
    ///
    /// Unreachable or malformed sources are reported to `sink` and skipped.
    /// A manifest that violates its format's contract is an error.
    pub fn complete(
        &self,
        name: &str,
        registration: &PluginRegistration,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<CanonicalPluginRecord> {
        let mut record = CanonicalPluginRecord::from_registration(name, registration);
        tracing::debug!(plugin = name, package = %record.package_name, "Completing record");

        record.hosted_on = hosted_on(&registration.code_home);
        if record.hosted_on.is_none() {
            sink.warn(format!(
                "Unable to determine hosting service of code_home: {}",
                registration.code_home
            ));
        }

        let index_data = registration
            .pypi_name
            .as_deref()
            .and_then(|package| self.index.fetch_index_metadata(package, sink));

        let mut context = ValidationContext::default();
        let mut entry_points = None;
        let mode = if let Some(data) = index_data {
            context.requires_dist_missing = !data.requires_dist_declared;
            record.metadata = Some(data.metadata);
            record.aiida_version = data.framework_version;
            record.pypi_builds = data.build_types;
            entry_points = data.entry_points;
            ParseMode::EntryPointsOnly
        } else {
            ParseMode::Full
        };

        if entry_points.is_none() {
            let (metadata, manifest_entry_points, framework_version) =
                self.read_manifest(registration, mode, sink)?.into_parts();
            entry_points = manifest_entry_points;
            if mode == ParseMode::Full {
                record.metadata = metadata;
                record.aiida_version = framework_version;
            }
        }
        record.entry_points = entry_points.unwrap_or_default();

        if let Some(url) = registration.version_file.as_deref() {
            if record.version().is_none() {
                self.read_version_file(&mut record, url, sink);
            }
        }

        if name == CORE_PACKAGE {
            let pin = record.version().map(|version| format!("=={version}"));
            if pin.is_some() {
                record.aiida_version = pin;
            }
        }

        validate(&mut record, registration, context, self.fetcher, sink);
        Ok(record)
    }

    fn read_manifest(
        &self,
        registration: &PluginRegistration,
        mode: ParseMode,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<SourceData> {
        let Some(url) = registration.plugin_info.as_deref() else {
            sink.warn("Missing plugin_info key".to_string());
            return Ok(SourceData::empty());
        };
        let content = match self.fetcher.get_text(url) {
            Ok(content) => content,
            Err(e) => {
                sink.warn(format!("Unable to retrieve plugin info from: {url} ({e})"));
                return Ok(SourceData::empty());
            }
        };
        Ok(parse_manifest(url, &content, mode, sink)?)
    }

    fn read_version_file(
        &self,
        record: &mut CanonicalPluginRecord,
        url: &str,
        sink: &mut dyn DiagnosticSink,
    ) {
        let content = match self.fetcher.get_text(url) {
            Ok(content) => content,
            Err(e) => {
                sink.warn(format!("Unable to retrieve version file from: {url} ({e})"));
                return;
            }
        };
        match version_from_module(&content) {
            Some(version) => {
                record
                    .metadata
                    .get_or_insert_with(PluginMetadata::default)
                    .version = Some(version);
            }
            None => sink.warn(format!("No __version__ found in version file: {url}")),
        }
    }
}

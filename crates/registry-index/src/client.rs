//! Client for a PyPI-compatible JSON API.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;

use chrono::NaiveDateTime;
use serde::Deserialize;

use registry_manifest::framework_version_from_requirements;
use registry_meta::config::IndexConfig;
use registry_meta::constants::WHEEL_PACKAGE_TYPE;
use registry_meta::{DiagnosticSink, EntryPoints, IndexData, PluginMetadata};

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::wheel::read_entry_points;

const UPLOAD_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// `GET <index>/<package>/json`
#[derive(Debug, Deserialize)]
pub(crate) struct PackageRecord {
    info: ReleaseInfo,
    #[serde(default)]
    releases: BTreeMap<String, Vec<ReleaseFile>>,
    /// Files of the current release.
    #[serde(default)]
    urls: Vec<ReleaseFile>,
}

#[derive(Debug, Deserialize)]
struct ReleaseInfo {
    version: String,
    summary: Option<String>,
    author: Option<String>,
    author_email: Option<String>,
    license: Option<String>,
    home_page: Option<String>,
    #[serde(default)]
    classifiers: Vec<String>,
    requires_dist: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ReleaseFile {
    packagetype: Option<String>,
    url: Option<String>,
    upload_time: Option<String>,
}

impl PackageRecord {
    pub(crate) fn parse(package: &str, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::InvalidRecord {
            package: package.to_string(),
            message: e.to_string(),
        })
    }

    fn metadata(&self) -> PluginMetadata {
        let info = &self.info;
        let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        PluginMetadata {
            description: present(&info.summary),
            author: present(&info.author),
            author_email: present(&info.author_email),
            license: present(&info.license),
            home_page: present(&info.home_page),
            classifiers: (!info.classifiers.is_empty()).then(|| info.classifiers.clone()),
            version: Some(info.version.clone()).filter(|v| !v.is_empty()),
            release_date: self.release_date(),
        }
    }

    /// Upload date of the first file of the current version.
    fn release_date(&self) -> Option<String> {
        let upload_time = self
            .releases
            .get(&self.info.version)?
            .first()?
            .upload_time
            .as_deref()?;
        match NaiveDateTime::parse_from_str(upload_time, UPLOAD_TIME_FORMAT) {
            Ok(time) => Some(time.format(RELEASE_DATE_FORMAT).to_string()),
            Err(e) => {
                tracing::debug!(upload_time, error = %e, "Unrecognized upload time");
                None
            }
        }
    }

    fn wheel_url(&self) -> Option<&str> {
        self.urls
            .iter()
            .find(|file| file.packagetype.as_deref() == Some(WHEEL_PACKAGE_TYPE))
            .and_then(|file| file.url.as_deref())
    }
}

/// Reads release records from the package index.
pub struct IndexClient<'f> {
    fetcher: &'f dyn Fetch,
    index_url: String,
    parse_wheels: bool,
}

impl<'f> IndexClient<'f> {
    pub fn new(fetcher: &'f dyn Fetch, config: &IndexConfig) -> Self {
        Self {
            fetcher,
            index_url: config.url.trim_end_matches('/').to_string(),
            parse_wheels: config.parse_wheels,
        }
    }

    /// URL of the JSON record of `package`.
    pub fn record_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.index_url, package)
    }

    /// Fetch the current release of `package`.
    ///
    /// Returns `None` with a warning when the package is not on the index or
    /// the index cannot be reached. An unpublished plugin is still processed
    /// from its build manifest.
    pub fn fetch_index_metadata(
        &self,
        package: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<IndexData> {
        let url = self.record_url(package);
        let content = match self.fetcher.get_text(&url) {
            Ok(content) => content,
            Err(e) => {
                sink.warn(format!("Unable to retrieve PyPI record from: {url} ({e})"));
                return None;
            }
        };
        let record = match PackageRecord::parse(package, &content) {
            Ok(record) => record,
            Err(e) => {
                sink.warn(e.to_string());
                return None;
            }
        };

        let requires_dist = record.info.requires_dist.as_deref().unwrap_or_default();
        let build_types = record
            .urls
            .iter()
            .filter_map(|file| file.packagetype.clone())
            .collect::<BTreeSet<_>>();

        if !build_types.contains(WHEEL_PACKAGE_TYPE) {
            sink.warn("No bdist_wheel available for PyPI release".to_string());
        }

        let entry_points = match record.wheel_url() {
            Some(wheel) if self.parse_wheels => self.fetch_entry_points_from_wheel(wheel, sink),
            _ => None,
        };

        Some(IndexData {
            metadata: record.metadata(),
            framework_version: framework_version_from_requirements(requires_dist),
            build_types,
            entry_points,
            requires_dist_declared: record.info.requires_dist.is_some(),
        })
    }

    /// Download the wheel at `url` and read its entry points.
    ///
    /// The archive is written to a temporary directory that is removed on
    /// return. Any failure is reported as a warning.
    pub fn fetch_entry_points_from_wheel(
        &self,
        url: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<EntryPoints> {
        match self.download_entry_points(url) {
            Ok(entry_points) => Some(entry_points),
            Err(e) => {
                sink.warn(format!("Unable to read wheel file from PyPI release: {e}"));
                None
            }
        }
    }

    fn download_entry_points(&self, url: &str) -> Result<EntryPoints> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("wheel.whl");

        let mut file = File::create(&path)?;
        let size = self.fetcher.download(url, &mut file)?;
        drop(file);
        tracing::debug!(url, size, "Downloaded wheel");

        read_entry_points(File::open(&path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const RECORD: &str = r#"{
        "info": {
            "version": "2.0.1",
            "summary": "AiiDA plugin for the CRYSTAL code",
            "author": "Chris Sewell",
            "author_email": "",
            "license": "MIT",
            "home_page": null,
            "classifiers": ["Framework :: AiiDA"],
            "requires_dist": ["aiida-core (<3,>=2.0)", "ase ; extra == 'tools'"]
        },
        "releases": {
            "2.0.0": [{"packagetype": "sdist", "upload_time": "2022-01-01T00:00:00"}],
            "2.0.1": [
                {"packagetype": "bdist_wheel", "upload_time": "2023-05-17T14:03:22"},
                {"packagetype": "sdist", "upload_time": "2023-05-17T14:05:00"}
            ]
        },
        "urls": [
            {"packagetype": "bdist_wheel", "url": "https://files.example/x-2.0.1-py3-none-any.whl"},
            {"packagetype": "sdist", "url": "https://files.example/x-2.0.1.tar.gz"}
        ]
    }"#;

    #[test]
    fn test_metadata_mapping() {
        let record = PackageRecord::parse("x", RECORD).unwrap();
        let meta = record.metadata();

        assert_eq!(meta.description.as_deref(), Some("AiiDA plugin for the CRYSTAL code"));
        assert_eq!(meta.author_email, None);
        assert_eq!(meta.home_page, None);
        assert_eq!(meta.license.as_deref(), Some("MIT"));
        assert_eq!(meta.version(), Some("2.0.1"));
        assert_eq!(meta.release_date.as_deref(), Some("2023-05-17"));
    }

    #[test]
    fn test_wheel_url() {
        let record = PackageRecord::parse("x", RECORD).unwrap();
        assert_eq!(
            record.wheel_url(),
            Some("https://files.example/x-2.0.1-py3-none-any.whl")
        );
    }

    #[test]
    fn test_missing_release_has_no_date() {
        let record = PackageRecord::parse(
            "x",
            r#"{"info": {"version": "1.0"}, "releases": {}, "urls": []}"#,
        )
        .unwrap();
        assert_eq!(record.release_date(), None);
        assert_eq!(record.wheel_url(), None);
    }

    #[rstest]
    #[case("2023-05-17T14:03:22", Some("2023-05-17"))]
    #[case("2020-01-01T00:00:00", Some("2020-01-01"))]
    #[case("2023-05-17", None)]
    #[case("2023-05-17T14:03:22.123456", None)]
    #[case("yesterday", None)]
    fn test_release_date_from_upload_time(
        #[case] upload_time: &str,
        #[case] expected: Option<&str>,
    ) {
        let content = serde_json::json!({
            "info": {"version": "1.0"},
            "releases": {"1.0": [{"packagetype": "sdist", "upload_time": upload_time}]},
            "urls": []
        })
        .to_string();
        let record = PackageRecord::parse("x", &content).unwrap();
        assert_eq!(record.release_date().as_deref(), expected);
    }

    #[test]
    fn test_invalid_record() {
        let err = PackageRecord::parse("x", "{\"info\": {}}").unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }
}

//! [`IndexRecord`] builder for package-index JSON records.

use serde_json::{Map, Value, json};

/// A release record as served by `GET <index>/<package>/json`.
#[derive(Debug, Clone)]
pub struct IndexRecord {
    version: String,
    summary: String,
    author: String,
    classifiers: Vec<String>,
    requires_dist: Option<Vec<String>>,
    wheel_url: Option<String>,
    sdist: bool,
    upload_time: String,
}

impl IndexRecord {
    /// A release of `version` with an sdist only.
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            summary: String::new(),
            author: String::new(),
            classifiers: Vec::new(),
            requires_dist: None,
            wheel_url: None,
            sdist: true,
            upload_time: "2024-03-01T09:30:00".to_string(),
        }
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = author.to_string();
        self
    }

    pub fn classifiers(mut self, classifiers: &[&str]) -> Self {
        self.classifiers = classifiers.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn requires_dist(mut self, requirements: &[&str]) -> Self {
        self.requires_dist = Some(requirements.iter().map(|r| r.to_string()).collect());
        self
    }

    /// Publish a wheel downloadable from `url`.
    pub fn wheel(mut self, url: &str) -> Self {
        self.wheel_url = Some(url.to_string());
        self
    }

    pub fn without_sdist(mut self) -> Self {
        self.sdist = false;
        self
    }

    pub fn upload_time(mut self, upload_time: &str) -> Self {
        self.upload_time = upload_time.to_string();
        self
    }

    pub fn to_json(&self) -> String {
        let mut files: Vec<Value> = Vec::new();
        if let Some(url) = &self.wheel_url {
            files.push(json!({
                "packagetype": "bdist_wheel",
                "url": url,
                "upload_time": self.upload_time,
            }));
        }
        if self.sdist {
            files.push(json!({
                "packagetype": "sdist",
                "url": format!("https://files.example/source-{}.tar.gz", self.version),
                "upload_time": self.upload_time,
            }));
        }

        let mut releases = Map::new();
        releases.insert(self.version.clone(), Value::Array(files.clone()));

        json!({
            "info": {
                "version": self.version,
                "summary": self.summary,
                "author": self.author,
                "author_email": "",
                "license": "MIT",
                "home_page": null,
                "classifiers": self.classifiers,
                "requires_dist": self.requires_dist,
            },
            "releases": releases,
            "urls": files,
        })
        .to_string()
    }
}

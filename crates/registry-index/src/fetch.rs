//! Blocking access to remote documents.

use std::io::Write;
use std::time::Duration;

use registry_meta::config::NetworkConfig;

use crate::error::{Error, Result};

/// Source of remote documents.
///
/// Every call is a single attempt; failures are final.
pub trait Fetch {
    /// Fetch a text document.
    fn get_text(&self, url: &str) -> Result<String>;

    /// Stream a binary document into `dest`, returning the bytes written.
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;

    /// Check that `url` answers with a success status.
    fn check(&self, url: &str) -> Result<()>;
}

/// [`Fetch`] over HTTP with per-operation timeouts.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    fetch_timeout: Duration,
    check_timeout: Duration,
    download_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            fetch_timeout: config.fetch_timeout(),
            check_timeout: config.check_timeout(),
            download_timeout: config.download_timeout(),
        })
    }

    fn get(&self, url: &str, timeout: Duration) -> Result<reqwest::blocking::Response> {
        tracing::debug!(url, ?timeout, "GET");
        self.client
            .get(url)
            .timeout(timeout)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::http(url, e))
    }
}

impl Fetch for HttpFetcher {
    fn get_text(&self, url: &str) -> Result<String> {
        self.get(url, self.fetch_timeout)?
            .text()
            .map_err(|e| Error::http(url, e))
    }

    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        let mut response = self.get(url, self.download_timeout)?;
        response.copy_to(dest).map_err(|e| Error::http(url, e))
    }

    fn check(&self, url: &str) -> Result<()> {
        self.get(url, self.check_timeout).map(|_| ())
    }
}

//! [`StubFetcher`] serving canned responses.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::Write;

use registry_index::{Error, Fetch, Result};

/// A [`Fetch`] that answers from memory.
///
/// Unknown URLs answer with HTTP 404. Every requested URL is recorded.
///
/// # Example
///
/// ```rust
/// use registry_index::Fetch;
/// use registry_test_utils::StubFetcher;
///
/// let fetcher = StubFetcher::new().with_text("https://example.com/setup.json", "{}");
/// assert_eq!(fetcher.get_text("https://example.com/setup.json").unwrap(), "{}");
/// assert!(fetcher.get_text("https://example.com/missing").is_err());
/// assert_eq!(fetcher.requests().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct StubFetcher {
    texts: HashMap<String, String>,
    binaries: HashMap<String, Vec<u8>>,
    reachable: HashSet<String>,
    requests: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as text from `url`. The URL also passes [`Fetch::check`].
    pub fn with_text(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        let url = url.into();
        self.reachable.insert(url.clone());
        self.texts.insert(url, body.into());
        self
    }

    /// Serve `bytes` as a download from `url`.
    pub fn with_binary(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.binaries.insert(url.into(), bytes);
        self
    }

    /// Let `url` pass [`Fetch::check`] without serving content.
    pub fn with_reachable(mut self, url: impl Into<String>) -> Self {
        self.reachable.insert(url.into());
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Whether `url` was requested.
    pub fn was_requested(&self, url: &str) -> bool {
        self.requests.borrow().iter().any(|r| r == url)
    }

    fn record(&self, url: &str) {
        self.requests.borrow_mut().push(url.to_string());
    }
}

fn not_found(url: &str) -> Error {
    Error::Status {
        url: url.to_string(),
        status: 404,
    }
}

impl Fetch for StubFetcher {
    fn get_text(&self, url: &str) -> Result<String> {
        self.record(url);
        self.texts.get(url).cloned().ok_or_else(|| not_found(url))
    }

    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        self.record(url);
        let bytes = self.binaries.get(url).ok_or_else(|| not_found(url))?;
        dest.write_all(bytes)?;
        Ok(bytes.len() as u64)
    }

    fn check(&self, url: &str) -> Result<()> {
        self.record(url);
        if self.reachable.contains(url) {
            Ok(())
        } else {
            Err(not_found(url))
        }
    }
}

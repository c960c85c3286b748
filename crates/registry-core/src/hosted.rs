//! Hosting-service normalization of `code_home`.

use url::Url;

/// Second-level domain hosting `url`, e.g. `github.com` for
/// `https://www.github.com/org/repo`.
///
/// Ports and subdomains are dropped. Only the last two host labels are
/// kept, so `example.co.uk` hosts come out as `co.uk`.
pub fn hosted_on(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let start = labels.len().saturating_sub(2);
    let domain = labels[start..].join(".");
    (!domain.is_empty()).then_some(domain)
}

//! Domain extraction utilities.
//!
//! This module decides which links are internal to a company site and derives a
//! fallback company name from the seed URL. Registrable domains come from
//! `tldextract`, so multi-part suffixes such as `co.uk` are handled correctly.
//!
//! Key functions:
//! - `registrable_domain()` - The registrable domain of a URL, if it has one
//! - `domain_label()` - The label left of the public suffix (`acme` for `www.acme.co.uk`)
//! - `same_site()` - Whether two URLs are on the same host

use std::sync::LazyLock;

use tldextract::{TldExtractor, TldOption};
use url::{Host, Url};

static EXTRACTOR: LazyLock<TldExtractor> =
    LazyLock::new(|| TldExtractor::new(TldOption::default()));

/// Returns the registrable domain (`example.co.uk` for `https://www.example.co.uk/x`).
///
/// IP addresses, single-label hosts such as `localhost` and hosts the suffix
/// list cannot split return `None`.
pub fn registrable_domain(url: &Url) -> Option<String> {
    let host = match url.host()? {
        Host::Domain(host) => host.to_ascii_lowercase(),
        Host::Ipv4(_) | Host::Ipv6(_) => return None,
    };

    let result = EXTRACTOR.extract(url.as_str()).ok()?;
    match (result.domain, result.suffix) {
        (Some(domain), Some(suffix)) if !domain.is_empty() && !suffix.is_empty() => {
            Some(format!("{}.{}", domain, suffix).to_ascii_lowercase())
        }
        _ => {
            log::trace!("No registrable domain for host {}", host);
            None
        }
    }
}

/// Returns the domain label of a URL (`acme` for `https://www.acme.co.uk`).
///
/// Falls back to the first host label for hosts without a registrable domain;
/// IP addresses have no label.
pub fn domain_label(url: &Url) -> Option<String> {
    if let Some(domain) = registrable_domain(url) {
        if let Some(label) = domain.split('.').next() {
            return Some(label.to_string());
        }
    }
    match url.host()? {
        Host::Domain(host) => host
            .trim_start_matches("www.")
            .split('.')
            .next()
            .filter(|label| !label.is_empty())
            .map(str::to_ascii_lowercase),
        Host::Ipv4(_) | Host::Ipv6(_) => None,
    }
}

/// Whether `candidate` is on the same host as `seed`.
///
/// Hosts compare case-insensitively and a single leading `www.` is ignored, so
/// `example.com` and `www.example.com` are one site while `blog.example.com`
/// is not.
pub fn same_site(seed: &Url, candidate: &Url) -> bool {
    match (seed.host_str(), candidate.host_str()) {
        (Some(a), Some(b)) => strip_www(a).eq_ignore_ascii_case(strip_www(b)),
        _ => false,
    }
}

fn strip_www(host: &str) -> &str {
    match host.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("www.") => &host[4..],
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}

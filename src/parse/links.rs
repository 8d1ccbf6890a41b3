//! Link discovery.

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

use crate::domain::same_site;
use crate::utils::parse_selector_unsafe;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("a[href]", "ANCHOR_SELECTOR"));

/// Collects every http(s) link on a page as an absolute URL without fragment.
///
/// Each `href` is resolved against `page_url`, the page's own final URL, so a
/// redirect to another host cannot make that host's relative links look like
/// the seed's.
pub fn extract_links(document: &Html, page_url: &Url) -> BTreeSet<String> {
    let mut links = BTreeSet::new();
    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        let Ok(mut resolved) = page_url.join(href) else {
            log::trace!("Skipping unresolvable href '{}' on {}", href, page_url);
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        resolved.set_fragment(None);
        links.insert(resolved.to_string());
    }
    links
}

/// Keeps the links on the seed's host.
pub fn internal_links<'a>(
    links: impl IntoIterator<Item = &'a String>,
    seed_url: &Url,
) -> BTreeSet<String> {
    links
        .into_iter()
        .filter(|link| {
            Url::parse(link)
                .map(|parsed| same_site(seed_url, &parsed))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("test URL should parse")
    }

    #[test]
    fn test_links_resolved_and_filtered() {
        let html = Html::parse_document(
            r##"<a href="/about#team">About</a>
               <a href="contact">Contact</a>
               <a href="https://www.acme.com/careers">Careers</a>
               <a href="https://twitter.com/acme">Twitter</a>
               <a href="mailto:hi@acme.com">Mail</a>
               <a href="#top">Top</a>
               <a href="javascript:void(0)">JS</a>"##,
        );
        let page = url("https://acme.com/company/");
        let all = extract_links(&html, &page);
        assert_eq!(all.len(), 4);
        assert!(all.contains("https://twitter.com/acme"));

        let internal = internal_links(&all, &url("https://acme.com/"));
        let expected: BTreeSet<String> = [
            "https://acme.com/about",
            "https://acme.com/company/contact",
            "https://www.acme.com/careers",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(internal, expected);
    }

    #[test]
    fn test_links_resolve_against_final_page_url() {
        // The seed redirected to another host; its relative links belong to that host
        let html = Html::parse_document(r#"<a href="/pricing">Pricing</a>"#);
        let all = extract_links(&html, &url("https://landing.example.net/"));
        assert!(internal_links(&all, &url("https://acme.com/")).is_empty());
    }
}

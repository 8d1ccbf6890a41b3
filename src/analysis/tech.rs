//! Technology detection from raw HTML.

use std::collections::BTreeSet;

/// Tags the technologies a page is built with.
pub trait TechDetector: Send + Sync {
    /// Names of the technologies found in `html`. Pure and deterministic.
    fn detect(&self, html: &str) -> BTreeSet<String>;
}

/// One technology and the lowercase substrings that reveal it.
struct Signature {
    name: &'static str,
    patterns: &'static [&'static str],
}

const SIGNATURES: &[Signature] = &[
    Signature {
        name: "Google Analytics",
        patterns: &[
            "google-analytics.com/analytics.js",
            "google-analytics.com/ga.js",
            "googletagmanager.com/gtag/js",
            "gtag('config'",
        ],
    },
    Signature {
        name: "Google Tag Manager",
        patterns: &["googletagmanager.com/gtm.js", "googletagmanager.com/ns.html"],
    },
    Signature {
        name: "React",
        patterns: &["data-reactroot", "react-dom.production", "_reactrootcontainer"],
    },
    Signature {
        name: "Next.js",
        patterns: &["__next_data__", "/_next/static/"],
    },
    Signature {
        name: "Vue.js",
        patterns: &["data-v-app", "vue.min.js", "vue.runtime", "vue.global"],
    },
    Signature {
        name: "Angular",
        patterns: &["ng-version=", "ng-app", "angular.min.js"],
    },
    Signature {
        name: "jQuery",
        patterns: &["jquery.min.js", "jquery.js", "code.jquery.com"],
    },
    Signature {
        name: "WordPress",
        patterns: &["wp-content/", "wp-includes/", "content=\"wordpress"],
    },
    Signature {
        name: "Shopify",
        patterns: &["cdn.shopify.com", "shopify.theme"],
    },
    Signature {
        name: "Wix",
        patterns: &["static.wixstatic.com", "wix.com website builder"],
    },
    Signature {
        name: "Squarespace",
        patterns: &["static1.squarespace.com", "squarespace-cdn.com"],
    },
    Signature {
        name: "Bootstrap",
        patterns: &["bootstrap.min.css", "bootstrap.min.js", "bootstrap.bundle"],
    },
    Signature {
        name: "Tailwind CSS",
        patterns: &["cdn.tailwindcss.com", "tailwind.min.css", "tailwindcss"],
    },
    Signature {
        name: "Cloudflare",
        patterns: &["/cdn-cgi/", "cdnjs.cloudflare.com", "cloudflareinsights.com"],
    },
    Signature {
        name: "HubSpot",
        patterns: &["js.hs-scripts.com", "js.hsforms.net", "js.hs-analytics.net"],
    },
];

/// Substring matching against a fixed signature table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternTechDetector;

impl TechDetector for PatternTechDetector {
    fn detect(&self, html: &str) -> BTreeSet<String> {
        let haystack = html.to_lowercase();
        SIGNATURES
            .iter()
            .filter(|signature| signature.patterns.iter().any(|p| haystack.contains(p)))
            .map(|signature| signature.name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_multiple_technologies() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="/wp-content/themes/x/bootstrap.min.css">
            <script src="https://code.jquery.com/jquery-3.7.1.min.js"></script>
            <script async src="https://www.googletagmanager.com/gtag/js?id=G-XYZ"></script>
            </head></html>"#;
        let found = PatternTechDetector.detect(html);
        let expected: BTreeSet<String> = ["Bootstrap", "Google Analytics", "WordPress", "jQuery"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_detection_is_case_insensitive() {
        let found = PatternTechDetector.detect(r#"<script id="__NEXT_DATA__"></script>"#);
        assert!(found.contains("Next.js"));
    }

    #[test]
    fn test_plain_page_has_no_technologies() {
        assert!(PatternTechDetector
            .detect("<html><body><p>Hello</p></body></html>")
            .is_empty());
    }

    #[test]
    fn test_signature_names_are_unique() {
        let names: BTreeSet<_> = SIGNATURES.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), SIGNATURES.len());
    }
}

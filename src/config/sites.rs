//! Default review-site table.

use super::types::SiteSearchConfig;
use crate::config::constants::DEFAULT_MAX_REVIEW_RESULTS_PER_SITE;

/// Review sites searched when the configuration does not provide its own list.
///
/// Lower priority values are searched first.
pub fn default_site_configs() -> Vec<SiteSearchConfig> {
    [
        ("g2", "g2.com", 1, " reviews"),
        ("capterra", "capterra.com", 2, " reviews"),
        ("trustpilot", "trustpilot.com", 3, ""),
        ("glassdoor", "glassdoor.com", 4, " reviews"),
        ("gartner", "gartner.com/reviews", 5, ""),
    ]
    .into_iter()
    .map(|(key, domain, priority, suffix)| SiteSearchConfig {
        key: key.to_string(),
        domain: domain.to_string(),
        priority,
        query_suffix: suffix.to_string(),
        max_results: DEFAULT_MAX_REVIEW_RESULTS_PER_SITE,
    })
    .collect()
}

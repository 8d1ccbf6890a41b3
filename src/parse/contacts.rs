//! Contact identifier extraction.
//!
//! Email addresses and phone numbers are matched by two independent patterns
//! over the page's visible text, plus `mailto:` and `tel:` link targets.

use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::utils::{compile_regex_unsafe, parse_selector_unsafe};

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,24}";
// Optional country code, optional area code in parentheses, then digit groups
// separated by single spaces, dots or dashes
const PHONE_PATTERN: &str =
    r"(?:\+\d{1,3}[\s.\-]?)?(?:\(\d{1,4}\)[\s.\-]?)?\d(?:[\s.\-]?\d){6,16}";

/// Suffixes that look like email domains but are asset names (`logo@2x.png`).
const ASSET_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(EMAIL_PATTERN, "EMAIL_RE"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(PHONE_PATTERN, "PHONE_RE"));
static CONTACT_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(
        "a[href^='mailto:'], a[href^='tel:'], a[href^='MAILTO:'], a[href^='TEL:']",
        "CONTACT_LINK_SELECTOR",
    )
});

/// Contact identifiers found on one page or merged across a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Contacts {
    /// Lowercased, deduplicated, sorted
    pub emails: Vec<String>,
    /// Digits only (leading `+` kept), deduplicated, sorted
    pub phones: Vec<String>,
}

impl Contacts {
    /// Merges `other` into `self`, keeping both lists deduplicated and sorted.
    pub fn merge(&mut self, other: &Contacts) {
        self.emails = merge_sorted(&self.emails, &other.emails);
        self.phones = merge_sorted(&self.phones, &other.phones);
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

fn merge_sorted(a: &[String], b: &[String]) -> Vec<String> {
    a.iter()
        .chain(b.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Extracts emails and phone numbers from free text.
pub fn extract_contacts_from_text(text: &str) -> Contacts {
    let mut emails = BTreeSet::new();
    let mut phones = BTreeSet::new();
    collect_emails(text, &mut emails);
    collect_phones(text, &mut phones);
    Contacts {
        emails: emails.into_iter().collect(),
        phones: phones.into_iter().collect(),
    }
}

/// Extracts contacts from visible text plus `mailto:`/`tel:` links.
pub fn extract_contacts(document: &Html, visible_text: &str) -> Contacts {
    let mut emails = BTreeSet::new();
    let mut phones = BTreeSet::new();
    collect_emails(visible_text, &mut emails);
    collect_phones(visible_text, &mut phones);

    for anchor in document.select(&CONTACT_LINK_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some((scheme, target)) = href.split_once(':') else {
            continue;
        };
        // Drop "?subject=..." and similar
        let target = target.split('?').next().unwrap_or("");
        if scheme.eq_ignore_ascii_case("mailto") {
            collect_emails(target, &mut emails);
        } else {
            collect_phones(target, &mut phones);
        }
    }

    Contacts {
        emails: emails.into_iter().collect(),
        phones: phones.into_iter().collect(),
    }
}

fn collect_emails(text: &str, out: &mut BTreeSet<String>) {
    for m in EMAIL_RE.find_iter(text) {
        let email = m.as_str().trim_end_matches('.').to_lowercase();
        if ASSET_SUFFIXES.iter().any(|suffix| email.ends_with(suffix)) {
            log::trace!("Skipping asset-like email match: {}", email);
            continue;
        }
        out.insert(email);
    }
}

fn collect_phones(text: &str, out: &mut BTreeSet<String>) {
    for m in PHONE_RE.find_iter(text) {
        if let Some(phone) = normalize_phone(m.as_str()) {
            out.insert(phone);
        }
    }
}

/// Normalizes a phone candidate to digits (with a leading `+` if present).
///
/// Returns `None` for candidates with too few or too many digits and for
/// numbers made of a single repeated digit (`1111111111`).
fn normalize_phone(candidate: &str) -> Option<String> {
    let digits: String = candidate.chars().filter(char::is_ascii_digit).collect();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return None;
    }
    let first = digits.chars().next()?;
    if digits.chars().all(|d| d == first) {
        log::trace!("Rejecting repeated-digit phone candidate: {}", candidate);
        return None;
    }
    if candidate.trim_start().starts_with('+') {
        Some(format!("+{}", digits))
    } else {
        Some(digits)
    }
}

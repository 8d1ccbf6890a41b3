//! Leadership and team entry extraction.
//!
//! Two passes: candidate containers are located by whole class tokens, then a
//! name, title, bio and LinkedIn link are looked up inside each container.
//! Entries keep document order and are deduplicated per page.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::dom::{ClassMatch, DomNode, SelectorSpec};
use crate::config::{
    LEADERSHIP_CONTAINER_CLASSES, MAX_BIO_PARAGRAPHS, MAX_LEADERSHIP_ENTRIES,
    MIN_BIO_PARAGRAPH_CHARS,
};
use crate::utils::compile_regex_unsafe;

const LINKEDIN_PROFILE_PATTERN: &str =
    r"^https?://(?:[a-z]{2,3}\.)?linkedin\.com/(?:in|pub|company)/[^/?#\s]+";

static TITLE_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe("(?i)title|position|role", "TITLE_CLASS_RE"));
static LINKEDIN_PROFILE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(LINKEDIN_PROFILE_PATTERN, "LINKEDIN_PROFILE_RE"));

const CONTAINER_SPEC: SelectorSpec = SelectorSpec::tags(&["div", "section", "li", "article"])
    .with_class(ClassMatch::AnyToken(LEADERSHIP_CONTAINER_CLASSES));
const NAME_HEADING_SPEC: SelectorSpec =
    SelectorSpec::tags(&["h2", "h3", "h4", "strong"]).with_class(ClassMatch::NotToken("title"));
const PARAGRAPH_SPEC: SelectorSpec = SelectorSpec::tags(&["p"]);
const ANCHOR_SPEC: SelectorSpec = SelectorSpec::tags(&["a"]);

/// Name element when no heading is present.
const NAME_CLASS_SPEC: SelectorSpec = SelectorSpec::tags(&[])
    .with_class(ClassMatch::AnyToken(&["name", "member-name", "profile-name"]));

/// One person found in a team/leadership container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipEntry {
    pub name: String,
    pub title: Option<String>,
    pub bio_snippet: Option<String>,
    pub linkedin_url: Option<String>,
    pub source_url: String,
}

impl LeadershipEntry {
    /// Dedup key: `(name, title)` for titled entries, `(name, None)` otherwise.
    pub fn dedup_key(&self) -> (String, Option<String>) {
        (self.name.clone(), self.title.clone())
    }
}

/// Extracts leadership entries under `root`, in container document order.
pub fn extract_leadership<N: DomNode>(root: N, source_url: &str) -> Vec<LeadershipEntry> {
    let containers = root.find_all(&CONTAINER_SPEC);
    log::debug!(
        "Found {} potential leadership containers on {}",
        containers.len(),
        source_url
    );

    let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
    let mut entries = Vec::new();

    for container in containers {
        if entries.len() >= MAX_LEADERSHIP_ENTRIES {
            break;
        }
        let Some(entry) = entry_from_container(container, source_url) else {
            continue;
        };
        if seen.insert(entry.dedup_key()) {
            log::debug!(
                "Extracted leader: name='{}', title='{}'",
                entry.name,
                entry.title.as_deref().unwrap_or("")
            );
            entries.push(entry);
        }
    }

    entries
}

fn entry_from_container<N: DomNode>(container: N, source_url: &str) -> Option<LeadershipEntry> {
    let name = find_name(container)?;
    let title = find_title(container);
    let bio_snippet = find_bio(container, title.as_deref());
    let linkedin_url = find_linkedin(container);

    Some(LeadershipEntry {
        name,
        title,
        bio_snippet,
        linkedin_url,
        source_url: source_url.to_string(),
    })
}

fn find_name<N: DomNode>(container: N) -> Option<String> {
    let node = container
        .find_first(&NAME_HEADING_SPEC)
        .or_else(|| container.find_first(&NAME_CLASS_SPEC))?;
    let name = node.text_content();
    (!name.is_empty()).then_some(name)
}

fn find_title<N: DomNode>(container: N) -> Option<String> {
    let spec = SelectorSpec::tags(&["p", "div", "span"])
        .with_class(ClassMatch::Pattern(&TITLE_CLASS_RE));
    container
        .find_first(&spec)
        .map(|node| node.text_content())
        .filter(|title| !title.is_empty())
}

/// First `MAX_BIO_PARAGRAPHS` paragraphs longer than the minimum, skipping any
/// paragraph equal to the title, joined with a space.
fn find_bio<N: DomNode>(container: N, title: Option<&str>) -> Option<String> {
    let paragraphs: Vec<String> = container
        .find_all(&PARAGRAPH_SPEC)
        .into_iter()
        .map(|p| p.text_content())
        .filter(|text| Some(text.as_str()) != title)
        .filter(|text| text.chars().count() > MIN_BIO_PARAGRAPH_CHARS)
        .take(MAX_BIO_PARAGRAPHS)
        .collect();
    (!paragraphs.is_empty()).then(|| paragraphs.join(" "))
}

fn find_linkedin<N: DomNode>(container: N) -> Option<String> {
    container
        .find_all(&ANCHOR_SPEC)
        .into_iter()
        .filter_map(|a| a.attribute("href").map(str::trim).map(str::to_string))
        .find(|href| LINKEDIN_PROFILE_RE.is_match(href))
}

//! Profile orchestration: page crawl plus review search.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use url::Url;

use crate::analysis::{KeywordSwotClassifier, PatternTechDetector, TechDetector, TextClassifier};
use crate::config::{Config, MAX_LEADERSHIP_ENTRIES, MIN_STATIC_TEXT_CHARS, SUBPATHS};
use crate::domain::domain_label;
use crate::error_handling::{ErrorKind, ProfileError};
use crate::fetch::{BrowserDriver, ChromiumDriver, FetchMode, FetchedPage, Fetcher, PageRecord};
use crate::parse::{internal_links, Contacts, LeadershipEntry};
use crate::profile::types::CompanyProfile;
use crate::search::{DuckDuckGoBackend, SearchBackend, SearchClient};

/// Markers of client-side app shells that render their content with scripts.
const SPA_ROOT_MARKERS: &[&str] = &[
    "id=\"root\"",
    "id=\"app\"",
    "id=\"__next\"",
    "id=\"__nuxt\"",
    "ng-version",
];

/// Builds [`CompanyProfile`]s from a seed URL.
pub struct Aggregator<D: BrowserDriver = ChromiumDriver, B: SearchBackend = DuckDuckGoBackend> {
    fetcher: Fetcher<D>,
    search: SearchClient<B>,
    classifier: Box<dyn TextClassifier>,
    tech_detector: Box<dyn TechDetector>,
}

impl Aggregator {
    /// Creates an aggregator with the production browser and search backends.
    ///
    /// # Errors
    ///
    /// Returns an error if the search endpoint or a proxy URL is invalid.
    pub fn new(client: Arc<reqwest::Client>, config: Arc<Config>) -> anyhow::Result<Self> {
        let fetcher = Fetcher::new(Arc::clone(&client), Arc::clone(&config));
        let search = SearchClient::new(client, config)?;
        Ok(Self::from_parts(fetcher, search))
    }
}

impl<D: BrowserDriver, B: SearchBackend> Aggregator<D, B> {
    /// Wires a fetcher and a search client with the default collaborators.
    pub fn from_parts(fetcher: Fetcher<D>, search: SearchClient<B>) -> Self {
        Self {
            fetcher,
            search,
            classifier: Box::new(KeywordSwotClassifier),
            tech_detector: Box::new(PatternTechDetector),
        }
    }

    pub fn with_classifier(mut self, classifier: impl TextClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn with_tech_detector(mut self, tech_detector: impl TechDetector + 'static) -> Self {
        self.tech_detector = Box::new(tech_detector);
        self
    }

    /// Crawls the seed and its subpaths while searching review sites.
    ///
    /// The two pipelines are polled together; an unreachable seed ends the
    /// request with a [`ProfileError`] and abandons the search. Every other
    /// failure only empties the fields it affects.
    pub async fn build_profile(
        &self,
        seed_url: &str,
        company_name: Option<&str>,
        location: Option<&str>,
    ) -> Result<CompanyProfile, ProfileError> {
        let company_name = company_name.map(str::trim).filter(|name| !name.is_empty());
        let location = location.map(str::trim).filter(|loc| !loc.is_empty());

        let search_name = company_name
            .map(str::to_string)
            .or_else(|| {
                Url::parse(seed_url.trim())
                    .ok()
                    .and_then(|url| domain_label(&url))
            })
            .unwrap_or_default();
        log::info!(
            "Building profile for {} (review search name: '{}')",
            seed_url,
            search_name
        );

        let crawl = self.crawl(seed_url);
        let reviews = async {
            Ok::<_, ProfileError>(self.search.search_reviews(&search_name, location).await)
        };
        let (merged, reviews) = tokio::try_join!(crawl, reviews)?;

        let swot = self.classifier.classify(&merged.texts.join(" "));
        log::info!(
            "Profile for {}: {} pages, {} internal links, {} leaders, {} reviews",
            seed_url,
            merged.pages.len(),
            merged.internal_links.len(),
            merged.leadership.len(),
            reviews.len()
        );

        Ok(CompanyProfile {
            seed_url: seed_url.trim().to_string(),
            company_name: company_name.map(str::to_string),
            location: location.map(str::to_string),
            pages: merged.pages,
            internal_links: merged.internal_links,
            contacts: merged.contacts,
            leadership: merged.leadership,
            technologies: merged.technologies,
            swot,
            reviews,
        })
    }

    /// Fetches the seed (with optional browser fallback) and every subpath, one at a time.
    async fn crawl(&self, seed_url: &str) -> Result<PageMerge, ProfileError> {
        let seed = self.fetcher.fetch_page(seed_url, FetchMode::Static).await;
        if let Some(kind) = seed.record.error_kind.filter(ErrorKind::is_unreachable) {
            return Err(ProfileError::new(
                kind,
                format!(
                    "seed URL {} is unreachable: {}",
                    seed.record.url,
                    seed.record.error_detail.as_deref().unwrap_or("no detail")
                ),
            ));
        }
        let site = Url::parse(&seed.record.url)
            .map_err(|e| ProfileError::new(ErrorKind::InvalidUrl, e.to_string()))?;

        let mut merge = PageMerge::default();
        if self.fetcher.config().dynamic_fallback && looks_script_rendered(&seed) {
            log::info!("{} looks script-rendered, fetching it with the browser", site);
            let rendered = self.fetcher.fetch_page(site.as_str(), FetchMode::Dynamic).await;
            if rendered.record.success {
                merge.push_record(seed.record);
                merge.absorb(rendered, &site, self.tech_detector.as_ref());
            } else {
                merge.absorb(seed, &site, self.tech_detector.as_ref());
                merge.push_record(rendered.record);
            }
        } else {
            merge.absorb(seed, &site, self.tech_detector.as_ref());
        }

        let mut visited: HashSet<String> = HashSet::from([site.to_string()]);
        for subpath in SUBPATHS {
            let Ok(target) = site.join(&format!("/{}", subpath)) else {
                continue;
            };
            if !visited.insert(target.to_string()) {
                continue;
            }
            let page = self
                .fetcher
                .fetch_page(target.as_str(), FetchMode::Static)
                .await;
            if !page.record.success {
                log::debug!(
                    "Subpage {} not usable: {}",
                    target,
                    page.record.error_detail.as_deref().unwrap_or("no detail")
                );
            }
            merge.absorb(page, &site, self.tech_detector.as_ref());
        }
        Ok(merge)
    }
}

/// Heuristic for pages whose static HTML is an empty app shell.
fn looks_script_rendered(page: &FetchedPage) -> bool {
    let Some(content) = &page.content else {
        return page.record.error_kind == Some(ErrorKind::ParseFailed);
    };
    if content.combined_text.chars().count() < MIN_STATIC_TEXT_CHARS {
        return true;
    }
    let has_app_root = page
        .raw_html
        .as_deref()
        .is_some_and(|html| SPA_ROOT_MARKERS.iter().any(|m| html.contains(m)));
    has_app_root && content.paragraphs.is_empty()
}

/// Cross-page accumulation of extracted content.
#[derive(Debug, Default)]
struct PageMerge {
    pages: Vec<PageRecord>,
    internal_links: BTreeSet<String>,
    contacts: Contacts,
    leadership: Vec<LeadershipEntry>,
    seen_leaders: HashSet<(String, Option<String>)>,
    technologies: BTreeSet<String>,
    texts: Vec<String>,
}

impl PageMerge {
    fn push_record(&mut self, record: PageRecord) {
        self.pages.push(record);
    }

    /// Records the page and merges its content when it was parsed.
    fn absorb(&mut self, page: FetchedPage, site: &Url, tech_detector: &dyn TechDetector) {
        let FetchedPage {
            record,
            raw_html,
            content,
        } = page;

        if let Some(content) = content {
            self.internal_links
                .extend(internal_links(&content.links, site));
            self.contacts.merge(&content.contacts);
            for entry in content.leadership {
                if self.leadership.len() >= MAX_LEADERSHIP_ENTRIES {
                    break;
                }
                if self.seen_leaders.insert(entry.dedup_key()) {
                    self.leadership.push(entry);
                }
            }
            if !content.combined_text.is_empty() {
                self.texts.push(content.combined_text);
            }
            if let Some(html) = raw_html.as_deref() {
                self.technologies.extend(tech_detector.detect(html));
            }
        }
        self.pages.push(record);
    }
}

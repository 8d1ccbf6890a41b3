//! End-to-end profile assembly against a mock company website.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use company_profiler::error_handling::SearchError;
use company_profiler::fetch::{BrowserDriver, BrowserError, BrowserSession};
use company_profiler::initialization::init_client;
use company_profiler::search::{RawSearchResult, SearchBackend};
use company_profiler::{Aggregator, Config, ErrorKind, FetchMode, Fetcher, SearchClient};

const HOME: &str = r#"<html><head><title>Acme Corp</title>
<script src="https://cdn.shopify.com/s/files/theme.js"></script></head>
<body>
  <h1>Acme builds award-winning widgets</h1>
  <p>Acme is a leading supplier of industrial widgets for factories worldwide.</p>
  <p>Call us on +1 (555) 010-9999 or write to hello@acme.test.</p>
  <a href="/about">About</a>
  <a href="/pricing#plans">Pricing</a>
  <a href="https://twitter.com/acme">Twitter</a>
</body></html>"#;

const ABOUT: &str = r#"<html><head><title>About Acme</title></head>
<body>
  <h1>Our team</h1>
  <p>We plan to expand into new markets next year.</p>
  <div class="team-member">
    <h3>Jane Doe</h3>
    <p class="title">Chief Executive Officer</p>
    <p>Jane has led Acme through a decade of steady growth in Europe.</p>
    <a href="https://www.linkedin.com/in/janedoe">LinkedIn</a>
  </div>
  <a href="mailto:careers@acme.test">Careers</a>
</body></html>"#;

const TEAM: &str = r#"<html><body>
  <div class="team-member"><h3>Jane Doe</h3><p class="title">Chief Executive Officer</p></div>
  <div class="team-member"><h3>John Roe</h3><p class="title">CTO</p></div>
</body></html>"#;

/// Always returns the same two review links.
struct FixedBackend;

impl SearchBackend for FixedBackend {
    async fn search(
        &self,
        _client: &reqwest::Client,
        _query: &str,
        _user_agent: &str,
    ) -> Result<Vec<RawSearchResult>, SearchError> {
        Ok(vec![
            RawSearchResult {
                title: "Acme Reviews".to_string(),
                link: "https://www.g2.com/products/acme/reviews".to_string(),
            },
            RawSearchResult {
                title: "Acme on Trustpilot".to_string(),
                link: "https://www.trustpilot.com/review/acme.test".to_string(),
            },
        ])
    }
}

fn test_config() -> Arc<Config> {
    Arc::new(Config {
        max_retries: 0,
        request_delay_seconds: 0.0,
        review_search_delay_seconds: 0.0,
        request_timeout_seconds: 5,
        ..Default::default()
    })
}

fn aggregator(config: Arc<Config>) -> Aggregator<company_profiler::fetch::ChromiumDriver, FixedBackend> {
    let client = init_client(&config).expect("client should build");
    let fetcher = Fetcher::new(Arc::clone(&client), Arc::clone(&config));
    let search = SearchClient::with_backend(client, config, FixedBackend)
        .expect("search client should build");
    Aggregator::from_parts(fetcher, search)
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_site(server: &MockServer) {
    for (route, body) in [("/", HOME), ("/about", ABOUT), ("/team", TEAM)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html(body))
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_profile_merges_pages_and_reviews() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let seed = format!("{}/", server.uri());

    let profile = aggregator(test_config())
        .build_profile(&seed, Some("Acme"), None)
        .await
        .expect("profile should build");

    assert_eq!(profile.company_name.as_deref(), Some("Acme"));
    // Seed plus every subpath, one record each
    assert_eq!(
        profile.pages.len(),
        1 + company_profiler::config::SUBPATHS.len()
    );
    assert!(profile.pages[0].success);
    assert_eq!(profile.pages.iter().filter(|p| p.success).count(), 3);

    assert!(profile
        .internal_links
        .contains(&format!("{}/pricing", server.uri())));
    assert!(!profile
        .internal_links
        .iter()
        .any(|link| link.contains("twitter.com")));

    assert_eq!(
        profile.contacts.emails,
        vec!["careers@acme.test", "hello@acme.test"]
    );
    assert_eq!(profile.contacts.phones, vec!["+15550109999"]);

    let names: Vec<_> = profile.leadership.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Jane Doe", "John Roe"]);
    assert_eq!(
        profile.leadership[0].linkedin_url.as_deref(),
        Some("https://www.linkedin.com/in/janedoe")
    );

    assert!(profile.technologies.contains("Shopify"));
    assert!(!profile.swot["Strengths"].is_empty());
    assert!(!profile.swot["Opportunities"].is_empty());

    assert_eq!(profile.reviews.len(), 2);

    let json = serde_json::to_value(&profile).expect("profile should serialize");
    assert!(json.get("seedUrl").is_some());
    assert!(json.get("internalLinks").is_some());
    assert!(json.get("location").is_none());
}

#[tokio::test]
async fn test_unreachable_seed_is_profile_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = aggregator(test_config())
        .build_profile(&format!("{}/", server.uri()), Some("Acme"), None)
        .await
        .expect_err("seed failure is fatal");

    assert_eq!(err.error_kind, ErrorKind::HttpError(500));
    let json = serde_json::to_value(&err).expect("error should serialize");
    assert_eq!(json["errorKind"], "http_error");
    assert!(json["message"].as_str().is_some_and(|m| m.contains("500")));
}

#[tokio::test]
async fn test_invalid_seed_url_is_profile_error() {
    let err = aggregator(test_config())
        .build_profile("not a url", Some("Acme"), None)
        .await
        .expect_err("invalid seed is fatal");
    assert_eq!(err.error_kind, ErrorKind::InvalidUrl);
}

#[tokio::test]
async fn test_non_html_seed_degrades_instead_of_failing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let profile = aggregator(test_config())
        .build_profile(&format!("{}/", server.uri()), Some("Acme"), None)
        .await
        .expect("content-type failure is not fatal");

    assert_eq!(
        profile.pages[0].error_kind,
        Some(ErrorKind::UnsupportedContentType)
    );
    assert!(profile.leadership.is_empty());
    assert!(profile.contacts.is_empty());
    assert_eq!(profile.reviews.len(), 2);
}

const APP_SHELL: &str = r#"<html><head><title>Acme</title></head>
<body><div id="root"></div><script src="/static/app.js"></script></body></html>"#;

/// Renders a fixed team page for whatever URL it is pointed at.
#[derive(Clone, Default)]
struct RenderingDriver {
    launches: Arc<AtomicUsize>,
}

struct RenderingSession {
    url: Option<String>,
}

impl BrowserDriver for RenderingDriver {
    type Session = RenderingSession;

    async fn launch(&self, _user_agent: &str) -> Result<RenderingSession, BrowserError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(RenderingSession { url: None })
    }
}

impl BrowserSession for RenderingSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.url = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&mut self) -> Option<String> {
        self.url.clone()
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        Ok(format!(
            r#"<html><head><title>Acme</title></head><body><div id="root">
               <h1>Acme builds widgets</h1>
               <p>{}</p>
               <div class="team-member"><h3>Rita Render</h3><p class="title">COO</p></div>
               </div></body></html>"#,
            "Acme has shipped industrial widgets to customers in forty countries. ".repeat(3)
        ))
    }

    async fn close(self) {}
}

fn rendering_aggregator(
    config: Arc<Config>,
    driver: RenderingDriver,
) -> Aggregator<RenderingDriver, FixedBackend> {
    let client = init_client(&config).expect("client should build");
    let fetcher = Fetcher::with_driver(Arc::clone(&client), Arc::clone(&config), driver);
    let search = SearchClient::with_backend(client, config, FixedBackend)
        .expect("search client should build");
    Aggregator::from_parts(fetcher, search)
}

async fn mount_app_shell(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(APP_SHELL))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_script_rendered_seed_falls_back_to_browser() {
    let server = MockServer::start().await;
    mount_app_shell(&server).await;

    let config = Arc::new(Config {
        dynamic_fallback: true,
        dynamic_settle_seconds: 0.0,
        ..(*test_config()).clone()
    });
    let driver = RenderingDriver::default();
    let launches = Arc::clone(&driver.launches);

    let profile = rendering_aggregator(config, driver)
        .build_profile(&format!("{}/", server.uri()), Some("Acme"), None)
        .await
        .expect("profile should build");

    assert_eq!(launches.load(Ordering::SeqCst), 1);
    // Static seed record, rendered seed record, then every subpath
    assert_eq!(
        profile.pages.len(),
        2 + company_profiler::config::SUBPATHS.len()
    );
    assert_eq!(profile.pages[0].mode, FetchMode::Static);
    assert_eq!(profile.pages[1].mode, FetchMode::Dynamic);
    assert!(profile.pages[1].success, "record: {:?}", profile.pages[1]);

    let names: Vec<_> = profile.leadership.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Rita Render"]);
}

#[tokio::test]
async fn test_browser_not_used_when_fallback_disabled() {
    let server = MockServer::start().await;
    mount_app_shell(&server).await;

    let driver = RenderingDriver::default();
    let launches = Arc::clone(&driver.launches);

    let profile = rendering_aggregator(test_config(), driver)
        .build_profile(&format!("{}/", server.uri()), Some("Acme"), None)
        .await
        .expect("profile should build");

    assert_eq!(launches.load(Ordering::SeqCst), 0);
    assert!(profile
        .pages
        .iter()
        .all(|page| page.mode == FetchMode::Static));
    assert!(profile.leadership.is_empty());
}

//! Dynamic fetch behavior with a scripted browser driver.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use company_profiler::fetch::{BrowserDriver, BrowserError, BrowserSession};
use company_profiler::{Config, ErrorKind, FetchMode, Fetcher};

#[derive(Debug, Clone, Copy)]
enum Script {
    Render,
    Hang,
    DnsFailure,
    EmptyShell,
}

#[derive(Clone)]
struct ScriptedDriver {
    live_sessions: Arc<AtomicUsize>,
    script: Script,
}

struct ScriptedSession {
    live_sessions: Arc<AtomicUsize>,
    script: Script,
}

impl BrowserDriver for ScriptedDriver {
    type Session = ScriptedSession;

    async fn launch(&self, _user_agent: &str) -> Result<ScriptedSession, BrowserError> {
        self.live_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession {
            live_sessions: Arc::clone(&self.live_sessions),
            script: self.script,
        })
    }
}

impl BrowserSession for ScriptedSession {
    async fn navigate(&mut self, _url: &str) -> Result<(), BrowserError> {
        match self.script {
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
            Script::DnsFailure => Err(BrowserError(
                "net::ERR_NAME_NOT_RESOLVED".to_string(),
            )),
            Script::Render | Script::EmptyShell => Ok(()),
        }
    }

    async fn current_url(&mut self) -> Option<String> {
        Some("https://acme.test/home".to_string())
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        match self.script {
            Script::EmptyShell => Ok("<html><body><div id=\"root\"></div></body></html>".to_string()),
            _ => Ok(format!(
                "<html><head><title>Rendered Acme</title></head><body><h1>Hello</h1><p>{}</p></body></html>",
                "Rendered by script. ".repeat(20)
            )),
        }
    }

    async fn close(self) {
        self.live_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

fn fetcher(script: Script) -> (Fetcher<ScriptedDriver>, Arc<AtomicUsize>) {
    let config = Arc::new(Config {
        request_delay_seconds: 0.0,
        dynamic_settle_seconds: 0.0,
        request_timeout_seconds: 1,
        ..Default::default()
    });
    let live_sessions = Arc::new(AtomicUsize::new(0));
    let driver = ScriptedDriver {
        live_sessions: Arc::clone(&live_sessions),
        script,
    };
    let client = Arc::new(reqwest::Client::new());
    (Fetcher::with_driver(client, config, driver), live_sessions)
}

#[tokio::test]
async fn test_rendered_page_is_extracted() {
    let (fetcher, live) = fetcher(Script::Render);
    let (record, raw_html) = fetcher
        .fetch("https://acme.test/", FetchMode::Dynamic)
        .await;

    assert!(record.success, "record: {record:?}");
    assert_eq!(record.mode, FetchMode::Dynamic);
    assert_eq!(record.url, "https://acme.test/home");
    assert_eq!(record.title, "Rendered Acme");
    assert_eq!(record.attempts, 1);
    assert!(raw_html.is_some());
    assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_navigation_error_is_classified_and_session_closed() {
    let (fetcher, live) = fetcher(Script::DnsFailure);
    let (record, raw_html) = fetcher
        .fetch("https://nope.invalid/", FetchMode::Dynamic)
        .await;

    assert_eq!(record.error_kind, Some(ErrorKind::DnsResolutionFailed));
    assert!(raw_html.is_none());
    assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_short_rendered_source_is_parse_failure() {
    let (fetcher, live) = fetcher(Script::EmptyShell);
    let (record, raw_html) = fetcher
        .fetch("https://acme.test/", FetchMode::Dynamic)
        .await;

    assert_eq!(record.error_kind, Some(ErrorKind::ParseFailed));
    assert!(record.raw_snippet.is_some());
    assert!(raw_html.is_some());
    assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_navigation_timeout_tears_down_session() {
    let (fetcher, live) = fetcher(Script::Hang);
    let (record, _) = fetcher
        .fetch("https://slow.acme.test/", FetchMode::Dynamic)
        .await;

    assert_eq!(record.error_kind, Some(ErrorKind::Timeout));
    assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_abandoned_fetch_releases_session_in_background() {
    let (fetcher, live) = fetcher(Script::Hang);
    let abandoned = tokio::time::timeout(
        Duration::from_millis(200),
        fetcher.fetch("https://slow.acme.test/", FetchMode::Dynamic),
    )
    .await;
    assert!(abandoned.is_err(), "fetch should still be navigating");

    // The guard's Drop spawned the close; give it a moment to run
    for _ in 0..50 {
        if live.load(Ordering::SeqCst) == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
#[ignore = "requires a local Chrome/Chromium installation and network access"]
async fn test_chromium_renders_real_page() {
    let config = Arc::new(Config {
        request_delay_seconds: 0.0,
        dynamic_settle_seconds: 1.0,
        ..Default::default()
    });
    let client = Arc::new(reqwest::Client::new());
    let fetcher = Fetcher::new(client, config);
    let (record, _) = fetcher
        .fetch("https://example.com/", FetchMode::Dynamic)
        .await;
    assert!(record.success, "record: {record:?}");
    assert!(record.title.contains("Example"));
}

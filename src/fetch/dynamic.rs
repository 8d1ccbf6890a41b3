//! Dynamic retrieval through a headless browser.
//!
//! A browser session is launched per fetch and owned by a [`SessionGuard`]:
//! the normal path closes it explicitly, and any early exit (error, timeout,
//! cancellation of the enclosing future) releases it from `Drop`.

use std::future::Future;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use url::Url;

use crate::config::Config;
use crate::error_handling::{categorize_message, ErrorKind, FetchError};
use crate::fetch::types::RawFetch;

/// Failure reported by a browser backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BrowserError(pub String);

impl BrowserError {
    fn kind(&self) -> ErrorKind {
        categorize_message(&self.0).unwrap_or(ErrorKind::Unexpected)
    }
}

/// One live browser with (at most) one open page.
pub trait BrowserSession: Send + 'static {
    /// Opens `url` and waits for the navigation to finish.
    fn navigate(&mut self, url: &str) -> impl Future<Output = Result<(), BrowserError>> + Send;

    /// URL of the open page after any redirects.
    fn current_url(&mut self) -> impl Future<Output = Option<String>> + Send;

    /// Serialized DOM of the open page.
    fn content(&mut self) -> impl Future<Output = Result<String, BrowserError>> + Send;

    /// Releases the page and the browser process.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Starts browser sessions.
pub trait BrowserDriver: Send + Sync {
    type Session: BrowserSession;

    fn launch(
        &self,
        user_agent: &str,
    ) -> impl Future<Output = Result<Self::Session, BrowserError>> + Send;
}

/// RAII owner of a browser session.
///
/// Prefer [`SessionGuard::close`]; if the guard is dropped with the session
/// still open, the close is spawned on the runtime captured at construction.
pub struct SessionGuard<S: BrowserSession> {
    session: Option<S>,
    runtime_handle: tokio::runtime::Handle,
}

impl<S: BrowserSession> SessionGuard<S> {
    /// Must be called from within a Tokio runtime.
    pub fn new(session: S) -> Self {
        Self {
            session: Some(session),
            runtime_handle: tokio::runtime::Handle::current(),
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    /// Closes the session and waits for teardown.
    pub async fn close(mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
    }
}

impl<S: BrowserSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Browser session dropped without close, releasing in background");
            self.runtime_handle.spawn(async move {
                session.close().await;
            });
        }
    }
}

/// Chromium over the DevTools protocol.
#[derive(Debug, Clone)]
pub struct ChromiumDriver {
    request_timeout: std::time::Duration,
}

impl ChromiumDriver {
    pub fn new(config: &Config) -> Self {
        Self {
            request_timeout: config.request_timeout(),
        }
    }
}

impl BrowserDriver for ChromiumDriver {
    type Session = ChromiumSession;

    async fn launch(&self, user_agent: &str) -> Result<ChromiumSession, BrowserError> {
        let browser_config = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.request_timeout)
            .arg("--disable-gpu")
            .arg(format!("--user-agent={}", user_agent))
            .build()
            .map_err(BrowserError)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError(format!("browser launch failed: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    log::trace!("DevTools handler error: {}", e);
                }
            }
        });

        Ok(ChromiumSession {
            browser,
            handler_task,
            page: None,
        })
    }
}

/// A launched Chromium process and its event-loop task.
pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Option<Page>,
}

impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError(e.to_string()))?;
        self.page = Some(page.clone());
        page.goto(url)
            .await
            .map_err(|e| BrowserError(e.to_string()))?;
        Ok(())
    }

    async fn current_url(&mut self) -> Option<String> {
        let page = self.page.as_ref()?;
        page.url().await.ok().flatten()
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        match &self.page {
            Some(page) => page.content().await.map_err(|e| BrowserError(e.to_string())),
            None => Err(BrowserError("no page open".to_string())),
        }
    }

    async fn close(mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                log::debug!("Failed to close page: {}", e);
            }
        }
        if let Err(e) = self.browser.close().await {
            log::debug!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            log::debug!("Failed to reap browser process: {}", e);
        }
        self.handler_task.abort();
    }
}

/// Renders `url` in a fresh browser session and returns the page source.
///
/// Navigation is bounded by `config.navigation_timeout()`; after it completes
/// the page gets a fixed settle interval for scripts to finish rendering.
pub(crate) async fn fetch_dynamic<D: BrowserDriver>(
    driver: &D,
    config: &Config,
    url: &Url,
    user_agent: &str,
) -> RawFetch {
    let session = match driver.launch(user_agent).await {
        Ok(session) => session,
        Err(e) => {
            log::warn!("Could not start browser for {}: {}", url, e);
            return RawFetch {
                final_url: url.to_string(),
                status_code: None,
                attempts: 1,
                body: Err(FetchError::new(ErrorKind::Unexpected, e.0)),
            };
        }
    };

    let mut guard = SessionGuard::new(session);
    let (final_url, body) = render(&mut guard, config, url).await;
    guard.close().await;

    RawFetch {
        final_url,
        status_code: None,
        attempts: 1,
        body,
    }
}

async fn render<S: BrowserSession>(
    guard: &mut SessionGuard<S>,
    config: &Config,
    url: &Url,
) -> (String, Result<String, FetchError>) {
    let fallback_url = url.to_string();
    let Some(session) = guard.session_mut() else {
        return (
            fallback_url,
            Err(FetchError::new(ErrorKind::Unexpected, "browser session already closed")),
        );
    };

    let navigation_timeout = config.navigation_timeout();
    match tokio::time::timeout(navigation_timeout, session.navigate(url.as_str())).await {
        Err(_) => {
            return (
                fallback_url,
                Err(FetchError::new(
                    ErrorKind::Timeout,
                    format!("navigation exceeded {:?}", navigation_timeout),
                )),
            );
        }
        Ok(Err(e)) => return (fallback_url, Err(FetchError::new(e.kind(), e.0))),
        Ok(Ok(())) => {}
    }

    tokio::time::sleep(config.dynamic_settle()).await;

    let final_url = session.current_url().await.unwrap_or(fallback_url);
    let body = match tokio::time::timeout(config.request_timeout(), session.content()).await {
        Err(_) => Err(FetchError::new(
            ErrorKind::Timeout,
            "reading rendered page source timed out",
        )),
        Ok(result) => result.map_err(|e| FetchError::new(e.kind(), e.0)),
    };
    (final_url, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_error_kind_from_message() {
        assert_eq!(
            BrowserError("net::ERR_NAME_NOT_RESOLVED".to_string()).kind(),
            ErrorKind::DnsResolutionFailed
        );
        assert_eq!(
            BrowserError("net::ERR_CONNECTION_REFUSED".to_string()).kind(),
            ErrorKind::ConnectionRefused
        );
        assert_eq!(
            BrowserError("something odd".to_string()).kind(),
            ErrorKind::Unexpected
        );
    }
}

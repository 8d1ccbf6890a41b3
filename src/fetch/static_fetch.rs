//! Static retrieval: plain HTTP GET with bounded retries.

use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Method, Response};
use url::Url;

use crate::config::{Config, MAX_RESPONSE_BODY_SIZE, RETRYABLE_STATUS_CODES};
use crate::error_handling::{categorize_reqwest_error, ErrorKind, FetchError};
use crate::fetch::request::RequestHeaders;
use crate::fetch::types::RawFetch;
use crate::utils::{run_with_retry, AttemptResult, RetryPolicy};

/// One failed attempt, with whatever the server told us before failing.
#[derive(Debug)]
struct AttemptFailure {
    error: FetchError,
    final_url: Option<String>,
    status_code: Option<u16>,
}

impl AttemptFailure {
    fn from_status(response: &Response) -> Self {
        let status = response.status();
        Self {
            error: FetchError::new(
                ErrorKind::HttpError(status.as_u16()),
                format!("HTTP {}", status),
            ),
            final_url: Some(response.url().to_string()),
            status_code: Some(status.as_u16()),
        }
    }

    fn from_transport(err: &reqwest::Error) -> Self {
        Self {
            error: FetchError::new(categorize_reqwest_error(err), err.to_string()),
            final_url: err.url().map(|u| u.to_string()),
            status_code: err.status().map(|s| s.as_u16()),
        }
    }
}

/// Methods whose requests may be replayed on a retryable status.
pub(crate) fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Reads a `Retry-After` header as either delay-seconds or an HTTP date.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    let date = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let wait = date.with_timezone(&chrono::Utc) - chrono::Utc::now();
    // A date in the past means "now"
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}

/// Accepts HTML-ish or unlabeled bodies.
fn is_supported_content_type(headers: &HeaderMap) -> Result<(), String> {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return Ok(());
    };
    let content_type = value.to_str().unwrap_or("").to_lowercase();
    if content_type.contains("html") || content_type.contains("xml") {
        Ok(())
    } else {
        Err(content_type)
    }
}

/// Reads the body chunk by chunk, refusing anything over the size cap.
async fn read_body(mut response: Response) -> Result<String, FetchError> {
    let mut buf: Vec<u8> = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                if buf.len() + chunk.len() > MAX_RESPONSE_BODY_SIZE {
                    return Err(FetchError::new(
                        ErrorKind::Unexpected,
                        format!(
                            "response body exceeds {} bytes",
                            MAX_RESPONSE_BODY_SIZE
                        ),
                    ));
                }
                buf.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(e) => {
                return Err(FetchError::new(categorize_reqwest_error(&e), e.to_string()));
            }
        }
    }

    match String::from_utf8(buf) {
        Ok(text) => Ok(text),
        Err(e) => {
            log::warn!("Response body is not valid UTF-8, decoding lossily");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Fetches `url` with a GET, retrying retryable statuses with exponential backoff.
pub(crate) async fn fetch_static(
    client: &reqwest::Client,
    config: &Config,
    url: &Url,
    user_agent: &str,
) -> RawFetch {
    let method = Method::GET;
    let retry_statuses = is_idempotent(&method);
    let policy = RetryPolicy::new(config.max_retries, config.retry_backoff_base());

    let outcome = run_with_retry(&policy, |attempt| {
        let request = RequestHeaders::apply_to_request_builder(
            client.request(method.clone(), url.clone()),
            user_agent,
        );
        async move {
            log::debug!("GET {} (attempt {})", url, attempt);
            match request.send().await {
                Ok(response) if response.status().is_success() => AttemptResult::Done(response),
                Ok(response) => {
                    let status = response.status().as_u16();
                    let failure = AttemptFailure::from_status(&response);
                    if retry_statuses && RETRYABLE_STATUS_CODES.contains(&status) {
                        AttemptResult::Retryable {
                            retry_after: parse_retry_after(response.headers()),
                            error: failure,
                        }
                    } else {
                        AttemptResult::Fatal(failure)
                    }
                }
                Err(e) => AttemptResult::Fatal(AttemptFailure::from_transport(&e)),
            }
        }
    })
    .await;

    let attempts = outcome.attempts;
    let response = match outcome.result {
        Ok(response) => response,
        Err(failure) => {
            log::info!("Static fetch of {} failed: {}", url, failure.error);
            return RawFetch {
                final_url: failure.final_url.unwrap_or_else(|| url.to_string()),
                status_code: failure.status_code,
                attempts,
                body: Err(failure.error),
            };
        }
    };

    let final_url = response.url().to_string();
    let status_code = Some(response.status().as_u16());

    if let Err(content_type) = is_supported_content_type(response.headers()) {
        log::info!("Skipping {} - non-HTML content-type: {}", final_url, content_type);
        return RawFetch {
            final_url,
            status_code,
            attempts,
            body: Err(FetchError::new(
                ErrorKind::UnsupportedContentType,
                format!("content-type {}", content_type),
            )),
        };
    }

    let body = read_body(response).await;
    if let Ok(text) = &body {
        log::debug!("Body length for {}: {} bytes", final_url, text.len());
    }
    RawFetch {
        final_url,
        status_code,
        attempts,
        body,
    }
}

//! Error categorization.
//!
//! Maps transport-level failures from `reqwest` and from the headless browser
//! onto [`ErrorKind`].

use std::error::Error as StdError;

use super::types::ErrorKind;

/// Categorizes a `reqwest::Error` into an `ErrorKind`.
///
/// Status errors map to `HttpError(status)`. Connection failures are split into
/// DNS and refused-connection cases by walking the error's source chain, since
/// `reqwest` only exposes `is_connect()` for both.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorKind {
    if let Some(status) = error.status() {
        return ErrorKind::HttpError(status.as_u16());
    }

    if error.is_timeout() {
        return ErrorKind::Timeout;
    }
    if error.is_redirect() {
        return ErrorKind::TooManyRedirects;
    }
    if error.is_builder() {
        return ErrorKind::InvalidUrl;
    }

    // Connect failures without a recognizable cause (TLS, reset) stay Unexpected
    categorize_source_chain(error).unwrap_or(ErrorKind::Unexpected)
}

/// Walks an error's `source()` chain looking for DNS or refused-connection causes.
fn categorize_source_chain(error: &(dyn StdError + 'static)) -> Option<ErrorKind> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(cause) = current {
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            match io_err.kind() {
                std::io::ErrorKind::ConnectionRefused => {
                    return Some(ErrorKind::ConnectionRefused)
                }
                std::io::ErrorKind::TimedOut => return Some(ErrorKind::Timeout),
                _ => {}
            }
        }
        if let Some(kind) = categorize_message(&cause.to_string()) {
            return Some(kind);
        }
        current = cause.source();
    }
    None
}

/// Classifies a free-form error message (browser errors, wrapped io errors).
///
/// Recognizes Chromium's `net::ERR_*` codes as well as the messages produced by
/// hyper's resolver and the OS.
pub fn categorize_message(message: &str) -> Option<ErrorKind> {
    let msg = message.to_lowercase();
    if msg.contains("err_name_not_resolved")
        || msg.contains("dns error")
        || msg.contains("failed to lookup address")
        || msg.contains("name or service not known")
        || msg.contains("nodename nor servname")
        || msg.contains("no such host")
    {
        return Some(ErrorKind::DnsResolutionFailed);
    }
    if msg.contains("err_connection_refused") || msg.contains("connection refused") {
        return Some(ErrorKind::ConnectionRefused);
    }
    if msg.contains("err_timed_out") || msg.contains("err_connection_timed_out") {
        return Some(ErrorKind::Timeout);
    }
    if msg.contains("err_too_many_redirects") {
        return Some(ErrorKind::TooManyRedirects);
    }
    None
}

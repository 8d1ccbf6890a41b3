//! Shared utilities.
//!
//! This module provides:
//! - The retry state machine used by static fetches and review searches
//! - String sanitization utilities
//! - CSS selector and regex compilation helpers for static patterns

mod retry;
pub mod sanitize;
mod selector;

pub use retry::{run_with_retry, AttemptResult, RetryPolicy, RetryState};
pub use selector::{compile_regex_unsafe, parse_selector_unsafe};

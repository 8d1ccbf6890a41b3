//! Error handling.
//!
//! This module provides:
//! - The [`ErrorKind`] taxonomy reported on page records and profile errors
//! - Typed errors for fetching, searching, profiling and initialization
//! - Categorization of transport errors into error kinds
//!
//! Only the aggregator decides which kinds are fatal for a whole profile; every
//! other component folds its failures into records or empty results.

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_message, categorize_reqwest_error};
pub use types::{ErrorKind, FetchError, InitializationError, ProfileError, SearchError};

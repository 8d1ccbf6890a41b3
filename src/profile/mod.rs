//! Company profile assembly.
//!
//! The [`Aggregator`] is the only component that decides whether a failure is
//! fatal for a whole request: an unreachable seed URL is, anything else merely
//! empties the affected fields.

mod aggregator;
mod types;

// Re-export public API
pub use aggregator::Aggregator;
pub use types::CompanyProfile;

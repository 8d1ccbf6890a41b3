//! Profile analysis collaborators.
//!
//! The aggregator depends only on the [`TextClassifier`] and [`TechDetector`]
//! traits; the default implementations here are small, pure and deterministic.

mod swot;
mod tech;

// Re-export public API
pub use swot::{KeywordSwotClassifier, TextClassifier, MAX_SWOT_ITEMS};
pub use tech::{PatternTechDetector, TechDetector};

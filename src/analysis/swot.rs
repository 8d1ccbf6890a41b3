//! Keyword-based SWOT classification.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::compile_regex_unsafe;
use crate::utils::sanitize::normalize_whitespace;

/// Sentences kept per category.
pub const MAX_SWOT_ITEMS: usize = 5;

/// Sorts free text into named categories.
pub trait TextClassifier: Send + Sync {
    /// Category name to matching statements. Pure and deterministic.
    fn classify(&self, text: &str) -> BTreeMap<String, Vec<String>>;
}

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"[.!?]+\s+", "SENTENCE_BREAK"));

static CATEGORIES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        (
            "Strengths",
            compile_regex_unsafe(
                r"(?i)\b(?:award|leader|leading|innovat|trusted|expert|patent|proven|best-in-class|industry-leading|certified)",
                "STRENGTHS",
            ),
        ),
        (
            "Weaknesses",
            compile_regex_unsafe(
                r"(?i)\b(?:limited|lack|challeng|declin|delay|shortage|weakness|complain|struggl)",
                "WEAKNESSES",
            ),
        ),
        (
            "Opportunities",
            compile_regex_unsafe(
                r"(?i)\b(?:growth|growing|expand|expansion|opportunit|emerging|new market|partnership|launch)",
                "OPPORTUNITIES",
            ),
        ),
        (
            "Threats",
            compile_regex_unsafe(
                r"(?i)\b(?:competit|regulat|risk|threat|lawsuit|downturn|disruption|recession)",
                "THREATS",
            ),
        ),
    ]
});

/// Assigns each sentence to every category whose keywords it contains.
///
/// All four categories are always present; each holds at most
/// [`MAX_SWOT_ITEMS`] distinct sentences in first-seen order.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSwotClassifier;

impl TextClassifier for KeywordSwotClassifier {
    fn classify(&self, text: &str) -> BTreeMap<String, Vec<String>> {
        let mut swot: BTreeMap<String, Vec<String>> = CATEGORIES
            .iter()
            .map(|(name, _)| (name.to_string(), Vec::new()))
            .collect();

        let sentences = SENTENCE_BREAK
            .split(text)
            .map(normalize_whitespace)
            .filter(|s| !s.is_empty());

        for sentence in sentences {
            for (name, keywords) in CATEGORIES.iter() {
                if !keywords.is_match(&sentence) {
                    continue;
                }
                if let Some(items) = swot.get_mut(*name) {
                    if items.len() < MAX_SWOT_ITEMS && !items.contains(&sentence) {
                        items.push(sentence.clone());
                    }
                }
            }
        }
        swot
    }
}

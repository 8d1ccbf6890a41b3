//! Tree-traversal abstraction used by the extraction heuristics.
//!
//! The leadership and contact heuristics walk the document through [`DomNode`]
//! instead of calling `scraper` directly, so they only depend on element names,
//! attributes, children and text.

use regex::Regex;
use scraper::ElementRef;

use crate::utils::sanitize::normalize_whitespace;

/// How an element's `class` attribute must look for a [`SelectorSpec`] to match.
#[derive(Debug, Clone)]
pub enum ClassMatch {
    /// No constraint
    Any,
    /// One of the whitespace-separated class tokens equals the value
    Token(&'static str),
    /// One of the class tokens equals any of the values
    AnyToken(&'static [&'static str]),
    /// The raw class attribute matches the pattern
    Pattern(&'static Regex),
    /// No class token equals the value (elements without a class match)
    NotToken(&'static str),
}

/// A small structural selector: a tag-name set plus a class constraint.
#[derive(Debug, Clone)]
pub struct SelectorSpec {
    /// Accepted tag names (lowercase); empty accepts any tag
    pub tags: &'static [&'static str],
    pub class: ClassMatch,
}

impl SelectorSpec {
    pub const fn tags(tags: &'static [&'static str]) -> Self {
        Self {
            tags,
            class: ClassMatch::Any,
        }
    }

    pub const fn with_class(mut self, class: ClassMatch) -> Self {
        self.class = class;
        self
    }
}

/// Read-only view of an element in a parsed document.
pub trait DomNode: Sized + Copy {
    /// Lowercase local tag name.
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Element children in document order.
    fn children(&self) -> Vec<Self>;

    /// Element descendants in document order, excluding `self`.
    fn descendants(&self) -> Vec<Self>;

    /// All descendant text with whitespace runs collapsed to single spaces.
    fn text_content(&self) -> String;

    fn matches(&self, spec: &SelectorSpec) -> bool {
        if !spec.tags.is_empty() && !spec.tags.contains(&self.tag_name()) {
            return false;
        }
        let class = self.attribute("class").unwrap_or("");
        match &spec.class {
            ClassMatch::Any => true,
            ClassMatch::Token(token) => class.split_whitespace().any(|c| c == *token),
            ClassMatch::AnyToken(tokens) => class.split_whitespace().any(|c| tokens.contains(&c)),
            ClassMatch::Pattern(re) => re.is_match(class),
            ClassMatch::NotToken(token) => !class.split_whitespace().any(|c| c == *token),
        }
    }

    /// First descendant matching `spec`, in document order.
    fn find_first(&self, spec: &SelectorSpec) -> Option<Self> {
        self.descendants().into_iter().find(|node| node.matches(spec))
    }

    /// Every descendant matching `spec`, in document order.
    fn find_all(&self, spec: &SelectorSpec) -> Vec<Self> {
        self.descendants()
            .into_iter()
            .filter(|node| node.matches(spec))
            .collect()
    }
}

impl<'a> DomNode for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn children(&self) -> Vec<Self> {
        // Deref to the underlying tree node to reach ego_tree's iterators
        (**self).children().filter_map(ElementRef::wrap).collect()
    }

    fn descendants(&self) -> Vec<Self> {
        (**self)
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .collect()
    }

    fn text_content(&self) -> String {
        normalize_whitespace(&self.text().collect::<Vec<_>>().join(" "))
    }
}

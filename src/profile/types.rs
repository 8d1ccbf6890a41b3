use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::fetch::PageRecord;
use crate::parse::{Contacts, LeadershipEntry};
use crate::search::ReviewSnippet;

/// Everything learned about one company in one analysis request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub seed_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// One record per fetch, in fetch order
    pub pages: Vec<PageRecord>,
    pub internal_links: BTreeSet<String>,
    pub contacts: Contacts,
    pub leadership: Vec<LeadershipEntry>,
    pub technologies: BTreeSet<String>,
    pub swot: BTreeMap<String, Vec<String>>,
    pub reviews: Vec<ReviewSnippet>,
}

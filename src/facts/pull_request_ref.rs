use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Where a pull request reference was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Provenance {
    /// Scraped from the issue page's linked pull request sidebar.
    Sidebar,

    /// Returned by the search API.
    Search,
}

/// A reference to a pull request related to an issue.
///
/// Two references with the same `number` denote the same pull request regardless of provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub url: String,
    pub number: u64,
    pub title: String,
    pub draft: bool,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub provenance: Provenance,
}

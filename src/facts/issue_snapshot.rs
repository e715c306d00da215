use crate::facts::IssueRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A label attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,

    /// Hex color without the leading `#`, as reported by the API.
    pub color: String,
}

/// An issue as fetched from the hosting API.
///
/// Snapshots are never patched in place; a re-fetch produces a new snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSnapshot {
    pub issue: IssueRef,
    pub title: String,
    pub body: String,
    pub labels: Vec<Label>,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assignees: Vec<String>,
}

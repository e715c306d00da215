//! Conversion of raw API payloads into the data model.
//!
//! Missing or `null` fields fall back to defaults; only a payload of the wrong overall shape
//! is reported, as [`TransportError::Decode`].

use crate::facts::{
    AuthorAssociation, CommentRecord, ForkInfo, IssueRef, IssueSnapshot, Label, Provenance, PullRequestRef,
};
use crate::transport::TransportError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Treat an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
struct RawUser {
    #[serde(default, deserialize_with = "nullable")]
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    color: String,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(default, deserialize_with = "nullable")]
    title: String,
    #[serde(default, deserialize_with = "nullable")]
    body: String,
    #[serde(default, deserialize_with = "nullable")]
    labels: Vec<RawLabel>,
    #[serde(default, deserialize_with = "nullable")]
    comments: u64,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    assignees: Vec<RawUser>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default, deserialize_with = "nullable")]
    author_association: String,
    #[serde(default, deserialize_with = "nullable")]
    body: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    html_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct RawSearch<T> {
    #[serde(default, deserialize_with = "nullable")]
    total_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RawSearchItem {
    #[serde(default, deserialize_with = "nullable")]
    number: u64,
    #[serde(default, deserialize_with = "nullable")]
    title: String,
    #[serde(default, deserialize_with = "nullable")]
    html_url: String,
    #[serde(default, deserialize_with = "nullable")]
    draft: bool,
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawFork {
    #[serde(default, deserialize_with = "nullable")]
    html_url: String,
    #[serde(default, deserialize_with = "nullable")]
    full_name: String,
    #[serde(default)]
    owner: Option<RawUser>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawBranch {
    #[serde(default, deserialize_with = "nullable")]
    name: String,
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, TransportError> {
    serde_json::from_value(value).map_err(|e| TransportError::Decode(format!("{what}: {e}")))
}

/// Parse a single issue. Missing timestamps fall back to the Unix epoch (`DateTime::default`).
pub fn parse_issue(issue: &IssueRef, value: Value) -> Result<IssueSnapshot, TransportError> {
    let raw: RawIssue = decode(value, "issue")?;
    let created_at = raw.created_at.unwrap_or_default();

    Ok(IssueSnapshot {
        issue: issue.clone(),
        title: raw.title,
        body: raw.body,
        labels: raw
            .labels
            .into_iter()
            .filter(|l| !l.name.is_empty())
            .map(|l| Label { name: l.name, color: l.color })
            .collect(),
        comment_count: raw.comments,
        created_at,
        updated_at: raw.updated_at.unwrap_or(created_at),
        assignees: raw.assignees.into_iter().map(|u| u.login).filter(|l| !l.is_empty()).collect(),
    })
}

/// Parse an issue comment listing. Comments without a timestamp cannot be aged and are dropped.
pub fn parse_comments(value: Value) -> Result<Vec<CommentRecord>, TransportError> {
    let raw: Vec<RawComment> = decode(value, "comments")?;

    Ok(raw
        .into_iter()
        .filter_map(|c| {
            Some(CommentRecord {
                author: c.user.unwrap_or_default().login,
                author_association: AuthorAssociation::from_api(&c.author_association),
                body: c.body,
                created_at: c.created_at?,
                url: c.html_url,
            })
        })
        .collect())
}

/// Parse pull request search results, tagging them with [`Provenance::Search`].
pub fn parse_pull_request_search(value: Value) -> Result<Vec<PullRequestRef>, TransportError> {
    let raw: RawSearch<RawSearchItem> = decode(value, "pull request search")?;

    Ok(raw
        .items
        .into_iter()
        .filter(|item| item.number > 0)
        .map(|item| PullRequestRef {
            url: item.html_url,
            number: item.number,
            title: item.title,
            draft: item.draft,
            author: item.user.map(|u| u.login).filter(|l| !l.is_empty()),
            created_at: item.created_at,
            updated_at: item.updated_at,
            provenance: Provenance::Search,
        })
        .collect())
}

/// Parse a fork listing. Forks without push or creation timestamps are dropped.
pub fn parse_forks(value: Value) -> Result<Vec<ForkInfo>, TransportError> {
    let raw: Vec<RawFork> = decode(value, "forks")?;

    Ok(raw
        .into_iter()
        .filter_map(|f| {
            Some(ForkInfo {
                url: f.html_url,
                full_name: f.full_name,
                owner_login: f.owner.unwrap_or_default().login,
                created_at: f.created_at?,
                pushed_at: f.pushed_at?,
            })
        })
        .collect())
}

/// Parse a branch listing into branch names.
pub fn parse_branches(value: Value) -> Result<Vec<String>, TransportError> {
    let raw: Vec<RawBranch> = decode(value, "branches")?;
    Ok(raw.into_iter().map(|b| b.name).filter(|n| !n.is_empty()).collect())
}

/// Total hit count of a search query.
pub fn parse_search_total(value: Value) -> Result<u64, TransportError> {
    let raw: RawSearch<Value> = decode(value, "search")?;
    Ok(raw.total_count)
}

use crate::cache::ApiCache;
use crate::facts::{CommentRecord, ForkInfo, IssueRef, IssueSnapshot, PullRequestRef, payload};
use crate::transport::{Endpoints, PER_PAGE, Transport, TransportError};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Upper bound on comment pages read for one issue.
const MAX_COMMENT_PAGES: u32 = 30;

/// Typed GitHub reads, each routed through the shared payload cache keyed by request URL.
#[derive(Debug)]
pub struct Fetcher<T> {
    transport: Arc<T>,
    cache: Arc<ApiCache>,
    endpoints: Endpoints,
}

impl<T> Fetcher<T>
where
    T: Transport + 'static,
{
    #[must_use]
    pub const fn new(transport: Arc<T>, cache: Arc<ApiCache>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            cache,
            endpoints,
        }
    }

    pub async fn issue(&self, issue: &IssueRef) -> Result<IssueSnapshot, TransportError> {
        let value = self.fetch(self.endpoints.issue(issue)).await?;
        payload::parse_issue(issue, value)
    }

    /// Every comment on the issue, oldest first, following pagination until a short page.
    ///
    /// A failure on any page fails the whole read, so callers never score a partial thread.
    pub async fn comments(&self, issue: &IssueRef) -> Result<Vec<CommentRecord>, TransportError> {
        let mut comments = Vec::new();
        for page in 1..=MAX_COMMENT_PAGES {
            let value = self.fetch(self.endpoints.comments_page(issue, page)).await?;
            let returned = value.as_array().map_or(0, Vec::len);
            comments.extend(payload::parse_comments(value)?);
            if returned < PER_PAGE {
                break;
            }
        }
        Ok(comments)
    }

    pub async fn search_pull_requests(&self, issue: &IssueRef) -> Result<Vec<PullRequestRef>, TransportError> {
        let value = self.fetch(self.endpoints.pull_request_search(issue)).await?;
        payload::parse_pull_request_search(value)
    }

    pub async fn forks(&self, issue: &IssueRef) -> Result<Vec<ForkInfo>, TransportError> {
        let value = self.fetch(self.endpoints.forks(issue)).await?;
        payload::parse_forks(value)
    }

    pub async fn branches(&self, fork: &ForkInfo) -> Result<Vec<String>, TransportError> {
        let value = self.fetch(self.endpoints.branches(&fork.full_name)).await?;
        payload::parse_branches(value)
    }

    /// Number of open issues in the repository of `issue` assigned to `login`.
    pub async fn open_assignments(&self, issue: &IssueRef, login: &str) -> Result<u64, TransportError> {
        let value = self.fetch(self.endpoints.assigned_open_issues(issue, login)).await?;
        payload::parse_search_total(value)
    }

    async fn fetch(&self, url: Url) -> Result<Value, TransportError> {
        let key = url.to_string();
        let transport = Arc::clone(&self.transport);
        self.cache
            .fetch_cached(&key, move || async move { transport.fetch(&url).await })
            .await
    }
}

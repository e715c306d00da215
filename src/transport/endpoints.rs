use crate::facts::IssueRef;
use url::Url;

/// Builds GitHub REST URLs relative to a configurable API base.
///
/// The request URL doubles as the cache key, so every builder must be deterministic.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

/// Page size requested from listing endpoints, the maximum GitHub allows.
pub const PER_PAGE: usize = 100;

impl Endpoints {
    /// # Errors
    ///
    /// Returns an error if `base` cannot carry path segments (e.g. `mailto:` URLs).
    pub fn new(base: Url) -> anyhow::Result<Self> {
        if base.cannot_be_a_base() {
            anyhow::bail!("'{base}' cannot be used as an API base URL");
        }
        Ok(Self { base })
    }

    #[must_use]
    pub fn issue(&self, issue: &IssueRef) -> Url {
        self.repo_url(issue, &["issues", &issue.number().to_string()])
    }

    /// First page of the issue's comments, oldest first.
    #[must_use]
    pub fn comments(&self, issue: &IssueRef) -> Url {
        self.comments_page(issue, 1)
    }

    /// One page of the issue's comments. Pages are numbered from 1; the first page
    /// carries no `page` parameter so its URL matches [`Self::comments`].
    #[must_use]
    pub fn comments_page(&self, issue: &IssueRef, page: u32) -> Url {
        let mut url = self.repo_url(issue, &["issues", &issue.number().to_string(), "comments"]);
        {
            let mut query = url.query_pairs_mut();
            let _ = query.append_pair("per_page", &PER_PAGE.to_string());
            if page > 1 {
                let _ = query.append_pair("page", &page.to_string());
            }
        }
        url
    }

    /// Pull requests in the same repository that mention the issue number.
    #[must_use]
    pub fn pull_request_search(&self, issue: &IssueRef) -> Url {
        let query = format!("repo:{} is:pr {}", issue.full_name(), issue.number());
        let mut url = self.url(&["search", "issues"]);
        let _ = url.query_pairs_mut().append_pair("q", &query).append_pair("per_page", "30");
        url
    }

    #[must_use]
    pub fn forks(&self, issue: &IssueRef) -> Url {
        let mut url = self.repo_url(issue, &["forks"]);
        let _ = url.query_pairs_mut().append_pair("sort", "newest").append_pair("per_page", &PER_PAGE.to_string());
        url
    }

    /// Branches of a fork, addressed by its `owner/repo` full name.
    #[must_use]
    pub fn branches(&self, fork_full_name: &str) -> Url {
        let mut segments = vec!["repos"];
        segments.extend(fork_full_name.split('/').filter(|s| !s.is_empty()));
        segments.push("branches");
        let mut url = self.url(&segments);
        let _ = url.query_pairs_mut().append_pair("per_page", &PER_PAGE.to_string());
        url
    }

    /// Open issues in the repository assigned to `login`.
    #[must_use]
    pub fn assigned_open_issues(&self, issue: &IssueRef, login: &str) -> Url {
        let query = format!("repo:{} is:issue is:open assignee:{login}", issue.full_name());
        let mut url = self.url(&["search", "issues"]);
        let _ = url.query_pairs_mut().append_pair("q", &query).append_pair("per_page", "1");
        url
    }

    fn repo_url(&self, issue: &IssueRef, rest: &[&str]) -> Url {
        let mut segments = vec!["repos", issue.owner(), issue.repo()];
        segments.extend_from_slice(rest);
        self.url(&segments)
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            let _ = path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base: Url::parse("https://api.github.com").expect("static URL is valid"),
        }
    }
}

use anyhow::{Context, bail};
use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// Identity of a single issue: repository owner, repository name, and issue number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueRef {
    owner: Arc<str>,
    repo: Arc<str>,
    number: u64,
}

impl IssueRef {
    #[must_use]
    pub fn new(owner: impl AsRef<str>, repo: impl AsRef<str>, number: u64) -> Self {
        Self {
            owner: Arc::from(owner.as_ref()),
            repo: Arc::from(repo.as_ref()),
            number,
        }
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// The `owner/repo` form used in search qualifiers.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn from_url(s: &str) -> anyhow::Result<Self> {
        let url = Url::parse(s).with_context(|| format!("parsing issue URL '{s}'"))?;
        let segments: Vec<&str> = url.path_segments().map(|segs| segs.filter(|p| !p.is_empty()).collect()).unwrap_or_default();

        match segments.as_slice() {
            [owner, repo, "issues", number, ..] => Self::from_parts(owner, repo, number),
            _ => bail!("'{s}' is not an issue URL (expected https://github.com/<owner>/<repo>/issues/<number>)"),
        }
    }

    fn from_parts(owner: &str, repo: &str, number: &str) -> anyhow::Result<Self> {
        if owner.is_empty() || repo.is_empty() {
            bail!("issue reference must name both an owner and a repository");
        }

        let number = number
            .parse::<u64>()
            .with_context(|| format!("parsing issue number '{number}'"))?;

        Ok(Self::new(owner, repo, number))
    }
}

impl FromStr for IssueRef {
    type Err = anyhow::Error;

    /// Accepts `owner/repo#123` or a full issue URL.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            return Self::from_url(s);
        }

        let Some((full_name, number)) = s.split_once('#') else {
            bail!("'{s}' is not an issue reference (expected <owner>/<repo>#<number>)");
        };

        let Some((owner, repo)) = full_name.split_once('/') else {
            bail!("'{full_name}' is not a repository name (expected <owner>/<repo>)");
        };

        Self::from_parts(owner, repo, number)
    }
}

impl Display for IssueRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_short_form() {
        let issue: IssueRef = "rust-lang/rust#123".parse().unwrap();
        assert_eq!(issue.owner(), "rust-lang");
        assert_eq!(issue.repo(), "rust");
        assert_eq!(issue.number(), 123);
    }

    #[test]
    fn test_from_str_url() {
        let issue: IssueRef = "https://github.com/tokio-rs/tokio/issues/42".parse().unwrap();
        assert_eq!(issue, IssueRef::new("tokio-rs", "tokio", 42));
    }

    #[test]
    fn test_from_str_url_with_fragment() {
        let issue: IssueRef = "https://github.com/a/b/issues/7#issuecomment-1".parse().unwrap();
        assert_eq!(issue, IssueRef::new("a", "b", 7));
    }

    #[test]
    fn test_from_str_pull_url_rejected() {
        let result: Result<IssueRef, _> = "https://github.com/a/b/pull/7".parse();
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_from_str_missing_number() {
        let result: Result<IssueRef, _> = "a/b".parse();
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_from_str_bad_number() {
        let result: Result<IssueRef, _> = "a/b#abc".parse();
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_from_str_empty_owner() {
        let result: Result<IssueRef, _> = "/b#1".parse();
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_display_roundtrip() {
        let issue = IssueRef::new("octo", "hello", 9);
        assert_eq!(issue.to_string(), "octo/hello#9");
        let parsed: IssueRef = issue.to_string().parse().unwrap();
        assert_eq!(parsed, issue);
    }

    #[test]
    fn test_full_name() {
        assert_eq!(IssueRef::new("octo", "hello", 9).full_name(), "octo/hello");
    }
}

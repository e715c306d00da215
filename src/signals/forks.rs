//! Detection of silent work happening in forks.

use crate::facts::{ForkInfo, ForkMatch};
use crate::transport::TransportError;
use chrono::{DateTime, TimeDelta, Utc};
use futures::future::join_all;

/// Log target for the fork scan
const LOG_TARGET: &str = "forks";

/// Forks pushed longer ago than this are ignored.
pub const RECENT_PUSH_WINDOW: TimeDelta = TimeDelta::days(30);

/// Upper bound on the number of forks whose branches are listed.
pub const MAX_CANDIDATES: usize = 5;

const BRANCH_HINTS: &[&str] = &["fix", "feature"];

/// Forks worth inspecting: pushed within [`RECENT_PUSH_WINDOW`], pushed at least once after
/// being created, most recently pushed first, at most [`MAX_CANDIDATES`].
#[must_use]
pub fn candidate_forks(forks: &[ForkInfo], now: DateTime<Utc>) -> Vec<&ForkInfo> {
    let mut candidates: Vec<&ForkInfo> = forks
        .iter()
        .filter(|fork| now.signed_duration_since(fork.pushed_at) <= RECENT_PUSH_WINDOW)
        .filter(|fork| fork.pushed_at != fork.created_at)
        .collect();

    candidates.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

/// The first branch whose name mentions the issue number or looks like fix/feature work.
#[must_use]
pub fn matching_branch(branches: &[String], issue_number: u64) -> Option<&str> {
    let number = issue_number.to_string();
    branches
        .iter()
        .map(String::as_str)
        .find(|name| {
            let lowered = name.to_lowercase();
            lowered.contains(&number) || BRANCH_HINTS.iter().any(|hint| lowered.contains(hint))
        })
}

/// Scan candidate forks for issue-related branches.
///
/// `list_branches` is called once per candidate, concurrently. A failed branch listing counts
/// as "no match" for that fork and never fails the scan.
pub async fn find_active_forks<'a, F, Fut>(forks: &'a [ForkInfo], issue_number: u64, now: DateTime<Utc>, list_branches: F) -> Vec<ForkMatch>
where
    F: Fn(&'a ForkInfo) -> Fut,
    Fut: Future<Output = Result<Vec<String>, TransportError>>,
{
    let candidates = candidate_forks(forks, now);
    log::debug!(target: LOG_TARGET, "{} of {} forks are candidates", candidates.len(), forks.len());

    let listings = join_all(candidates.iter().map(|&fork| list_branches(fork))).await;

    candidates
        .into_iter()
        .zip(listings)
        .filter_map(|(fork, listing)| {
            let branches = listing
                .inspect_err(|e| log::warn!(target: LOG_TARGET, "could not list branches of '{}': {e}", fork.full_name))
                .ok()?;

            let branch = matching_branch(&branches, issue_number)?;
            Some(ForkMatch {
                fork_url: fork.url.clone(),
                owner_login: fork.owner_login.clone(),
                branch: branch.to_string(),
                pushed_at: fork.pushed_at,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn fork(owner: &str, created_days_ago: i64, pushed_days_ago: i64) -> ForkInfo {
        ForkInfo {
            url: format!("https://github.com/{owner}/repo"),
            full_name: format!("{owner}/repo"),
            owner_login: owner.to_string(),
            created_at: now() - TimeDelta::days(created_days_ago),
            pushed_at: now() - TimeDelta::days(pushed_days_ago),
        }
    }

    fn branches(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_old_push_is_excluded() {
        let forks = [fork("old", 60, 40)];
        assert!(candidate_forks(&forks, now()).is_empty());
    }

    #[test]
    fn test_untouched_fork_is_excluded() {
        let forks = [fork("idle", 3, 3)];
        assert!(candidate_forks(&forks, now()).is_empty());
    }

    #[test]
    fn test_candidates_capped_and_sorted() {
        let forks: Vec<_> = (1..=8).map(|d| fork(&format!("u{d}"), 50, d)).collect();
        let candidates = candidate_forks(&forks, now());
        let owners: Vec<_> = candidates.iter().map(|f| f.owner_login.as_str()).collect();
        assert_eq!(owners, ["u1", "u2", "u3", "u4", "u5"]);
    }

    #[test]
    fn test_matching_branch_rules() {
        assert_eq!(matching_branch(&branches(&["main", "fix-123"]), 123), Some("fix-123"));
        assert_eq!(matching_branch(&branches(&["main", "issue-123"]), 123), Some("issue-123"));
        assert_eq!(matching_branch(&branches(&["main", "Feature/login"]), 9), Some("Feature/login"));
        assert_eq!(matching_branch(&branches(&["main", "develop"]), 9), None);
    }

    #[tokio::test]
    async fn test_recent_fork_with_fix_branch_is_included() {
        let forks = [fork("active", 20, 5)];
        let matches = find_active_forks(&forks, 123, now(), |_| async { Ok(branches(&["main", "fix-123"])) }).await;

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].owner_login, "active");
        assert_eq!(matches[0].branch, "fix-123");
    }

    #[tokio::test]
    async fn test_stale_fork_excluded_regardless_of_branches() {
        let calls = AtomicUsize::new(0);
        let forks = [fork("stale", 60, 40)];
        let matches = find_active_forks(&forks, 123, now(), |_| {
            let _ = calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(branches(&["fix-123"])) }
        })
        .await;

        assert!(matches.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_branch_listing_failure_is_swallowed() {
        let forks = [fork("broken", 20, 1), fork("fine", 20, 2)];
        let matches = find_active_forks(&forks, 7, now(), |f| {
            let broken = f.owner_login == "broken";
            async move {
                if broken {
                    Err(TransportError::Api {
                        status: 404,
                        url: "https://api.github.com/repos/broken/repo/branches".to_string(),
                    })
                } else {
                    Ok(branches(&["feature-7"]))
                }
            }
        })
        .await;

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].owner_login, "fine");
    }
}

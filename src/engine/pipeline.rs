use crate::cache::ApiCache;
use crate::config::{Config, Features};
use crate::engine::{Evaluation, Fetcher, PageContext, Session};
use crate::facts::{CommentRecord, ForkMatch, IssueRef, IssueSnapshot, PullRequestRef};
use crate::scoring::{
    DifficultyInput, IssueStats, StatInput, assess_difficulty, assess_momentum, comment_histogram, derive_axes, resolve_status,
};
use crate::signals::{AssigneeWorkload, detect_claims, dedupe_pull_requests, find_active_forks};
use crate::transport::{Endpoints, Transport, TransportError};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::Arc;

/// Log target for the evaluation pipeline
const LOG_TARGET: &str = "engine";

/// Evaluates issues against GitHub.
///
/// Independent reads (issue, comments, pull request search, fork scan, assignee workload) run
/// concurrently and are joined before the difficulty and status verdicts are computed. Every
/// remote failure is logged and degrades only the component that needed it.
#[derive(Debug)]
pub struct Engine<T> {
    fetcher: Fetcher<T>,
    features: Features,
    overload_threshold: u64,
}

impl<T> Engine<T>
where
    T: Transport + 'static,
{
    #[must_use]
    pub fn new(transport: Arc<T>, cache: Arc<ApiCache>, endpoints: Endpoints, features: Features, overload_threshold: u64) -> Self {
        Self {
            fetcher: Fetcher::new(transport, cache, endpoints),
            features,
            overload_threshold,
        }
    }

    /// Build an engine from a loaded configuration with a fresh cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured API base cannot be used to build request URLs.
    pub fn from_config(transport: Arc<T>, config: &Config) -> anyhow::Result<Self> {
        let endpoints = Endpoints::new(config.api_base.clone())?;
        Ok(Self::new(
            transport,
            Arc::new(ApiCache::new()),
            endpoints,
            config.features,
            config.workload_overload_threshold,
        ))
    }

    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    pub async fn evaluate(&self, issue: &IssueRef, page: &PageContext) -> Evaluation {
        self.evaluate_at(issue, page, Utc::now()).await
    }

    /// Evaluate `issue` as of `now`.
    pub async fn evaluate_at(&self, issue: &IssueRef, page: &PageContext, now: DateTime<Utc>) -> Evaluation {
        log::info!(target: LOG_TARGET, "evaluating {issue}");
        let features = self.features;

        let (snapshot, fetched_comments, pull_requests, forks, workload) = futures::join!(
            self.snapshot(issue),
            self.fetched_comments(issue, page),
            self.pull_requests(issue, page),
            self.active_forks(issue, now),
            self.workload(issue),
        );

        let claims = if features.claim_detection {
            let comments = if page.comments.is_empty() {
                fetched_comments.as_deref().unwrap_or_default()
            } else {
                page.comments.as_slice()
            };
            detect_claims(comments, now)
        } else {
            Vec::new()
        };

        let momentum = if features.momentum {
            snapshot
                .as_ref()
                .zip(fetched_comments.as_deref())
                .map(|(snapshot, comments)| assess_momentum(snapshot, comments, now))
        } else {
            None
        };

        let difficulty = features.difficulty.then(|| {
            let input = snapshot.as_ref().map_or_else(
                || DifficultyInput::unknown(pull_requests.len()),
                |s| DifficultyInput::from_issue(s, pull_requests.len()),
            );
            assess_difficulty(&input)
        });

        let stats = features.stats.then(|| {
            let axes = derive_axes(&StatInput {
                momentum: momentum.as_ref(),
                difficulty: difficulty.as_ref(),
                comment_count: snapshot.as_ref().map_or(0, |s| s.comment_count),
                pull_request_count: pull_requests.len(),
                body: snapshot.as_ref().map_or("", |s| s.body.as_str()),
            });

            let timeline = fetched_comments.as_deref().unwrap_or(page.comments.as_slice());
            IssueStats {
                axes,
                comment_histogram: comment_histogram(timeline.iter().map(|c| c.created_at), now.date_naive()),
            }
        });

        let status = resolve_status(&pull_requests, &claims, &forks);
        log::info!(target: LOG_TARGET, "{issue} is {status}");

        Evaluation {
            issue: issue.clone(),
            title: snapshot.map(|s| s.title),
            evaluated_at: now,
            status,
            pull_requests,
            claims,
            forks,
            momentum,
            difficulty,
            workload,
            stats,
        }
    }

    /// Evaluate and publish into `session`, unless a newer evaluation was started meanwhile.
    pub async fn refresh(&self, session: &Session, issue: &IssueRef, page: &PageContext) -> Option<Arc<Evaluation>> {
        let ticket = session.begin();
        let evaluation = self.evaluate(issue, page).await;

        let published = session.publish(ticket, evaluation);
        if published.is_none() {
            log::debug!(target: LOG_TARGET, "discarding superseded evaluation of {issue}");
        }
        published
    }

    async fn snapshot(&self, issue: &IssueRef) -> Option<IssueSnapshot> {
        let f = self.features;
        if !(f.momentum || f.difficulty || f.stats || f.workload) {
            return None;
        }
        soft("issue", self.fetcher.issue(issue).await)
    }

    async fn fetched_comments(&self, issue: &IssueRef, page: &PageContext) -> Option<Vec<CommentRecord>> {
        let f = self.features;
        let for_claims = f.claim_detection && page.comments.is_empty();
        if !(f.momentum || f.stats || for_claims) {
            return None;
        }
        soft("comments", self.fetcher.comments(issue).await)
    }

    async fn pull_requests(&self, issue: &IssueRef, page: &PageContext) -> Vec<PullRequestRef> {
        if !self.features.pr_detection {
            return Vec::new();
        }
        let searched = soft("pull request search", self.fetcher.search_pull_requests(issue).await).unwrap_or_default();
        dedupe_pull_requests(&page.sidebar_pull_requests, &searched)
    }

    async fn active_forks(&self, issue: &IssueRef, now: DateTime<Utc>) -> Vec<ForkMatch> {
        if !self.features.fork_activity {
            return Vec::new();
        }
        let Some(forks) = soft("forks", self.fetcher.forks(issue).await) else {
            return Vec::new();
        };
        find_active_forks(&forks, issue.number(), now, |fork| self.fetcher.branches(fork)).await
    }

    async fn workload(&self, issue: &IssueRef) -> Vec<AssigneeWorkload> {
        if !self.features.workload {
            return Vec::new();
        }

        // Shares the in-flight issue read with `snapshot` through the cache.
        let Some(snapshot) = soft("issue", self.fetcher.issue(issue).await) else {
            return Vec::new();
        };

        let counts = join_all(
            snapshot
                .assignees
                .iter()
                .map(|login| self.fetcher.open_assignments(issue, login)),
        )
        .await;

        snapshot
            .assignees
            .iter()
            .zip(counts)
            .filter_map(|(login, count)| {
                let count = soft("assignee workload", count)?;
                Some(AssigneeWorkload::new(login.as_str(), count, self.overload_threshold))
            })
            .collect()
    }
}

/// Turn a failed read into an absent value, logging it.
fn soft<V>(component: &str, result: Result<V, TransportError>) -> Option<V> {
    result
        .inspect_err(|e| log::warn!(target: LOG_TARGET, "{component} unavailable: {e}"))
        .ok()
}

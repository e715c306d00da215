use crate::facts::{CommentRecord, ForkMatch, IssueRef, PullRequestRef};
use crate::scoring::{ContributionStatus, DifficultyAssessment, IssueStats, MomentumAssessment};
use crate::signals::{AssigneeWorkload, ClaimRecord, freshest_active_claim};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Data read from the issue page itself rather than fetched from the API.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Comments visible on the page. When empty, comments are fetched instead.
    pub comments: Vec<CommentRecord>,

    /// Pull requests linked in the page sidebar.
    pub sidebar_pull_requests: Vec<PullRequestRef>,
}

/// Everything derived for one issue at one instant.
///
/// A component that was disabled, or whose remote reads failed, shows up as an empty list or
/// `None`; an evaluation is always complete in shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub issue: IssueRef,
    pub title: Option<String>,
    pub evaluated_at: DateTime<Utc>,
    pub status: ContributionStatus,
    pub pull_requests: Vec<PullRequestRef>,
    pub claims: Vec<ClaimRecord>,
    pub forks: Vec<ForkMatch>,
    pub momentum: Option<MomentumAssessment>,
    pub difficulty: Option<DifficultyAssessment>,
    pub workload: Vec<AssigneeWorkload>,
    pub stats: Option<IssueStats>,
}

impl Evaluation {
    /// The claim to highlight, if any claim is still fresh.
    #[must_use]
    pub fn active_claim(&self) -> Option<&ClaimRecord> {
        freshest_active_claim(&self.claims)
    }

    /// Assignees carrying more open issues than the configured threshold.
    pub fn overloaded_assignees(&self) -> impl Iterator<Item = &AssigneeWorkload> {
        self.workload.iter().filter(|w| w.is_overloaded)
    }
}

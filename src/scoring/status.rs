//! The tri-state contribution verdict.

use crate::facts::{ForkMatch, PullRequestRef};
use crate::signals::ClaimRecord;
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ContributionStatus {
    Clear,
    Claimed,
    ActivePr,
}

/// Badge color for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl ContributionStatus {
    #[must_use]
    pub const fn color(self) -> StatusColor {
        match self {
            Self::Clear => StatusColor::Green,
            Self::Claimed => StatusColor::Yellow,
            Self::ActivePr => StatusColor::Red,
        }
    }

    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Clear => "No one appears to be working on this issue",
            Self::Claimed => "Someone may already be working on this issue",
            Self::ActivePr => "A pull request is already open for this issue",
        }
    }
}

/// Classify the current state of an issue.
///
/// First matching rule wins:
///
/// 1. any pull request: [`ContributionStatus::ActivePr`]
/// 2. any fresh claim: [`ContributionStatus::Claimed`]
/// 3. any stale claim, or any fork activity: [`ContributionStatus::Claimed`]
/// 4. otherwise [`ContributionStatus::Clear`]
///
/// Rules 2 and 3 lead to the same outcome although a stale claim and fork activity mean
/// different things; the distinction is kept in the cascade so it can be split later.
#[must_use]
#[expect(clippy::if_same_then_else, reason = "stale claims and fork activity stay separate rules")]
pub fn resolve_status(pull_requests: &[PullRequestRef], claims: &[ClaimRecord], forks: &[ForkMatch]) -> ContributionStatus {
    if !pull_requests.is_empty() {
        ContributionStatus::ActivePr
    } else if claims.iter().any(|c| !c.is_stale) {
        ContributionStatus::Claimed
    } else if claims.iter().any(|c| c.is_stale) || !forks.is_empty() {
        ContributionStatus::Claimed
    } else {
        ContributionStatus::Clear
    }
}

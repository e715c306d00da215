//! Engagement velocity of an issue.

use crate::facts::{CommentRecord, IssueSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

const BASELINE: i32 = 50;

/// Discrete reading of a momentum score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum MomentumLabel {
    Active,
    Slow,
    Stalled,
}

impl MomentumLabel {
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            70.. => Self::Active,
            40.. => Self::Slow,
            _ => Self::Stalled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumAssessment {
    /// 0..=100
    pub score: u8,
    pub label: MomentumLabel,
    pub days_since_update: f64,
    pub days_since_open: f64,
    pub comment_count: u64,

    /// Days from opening until the first maintainer comment; `None` if no maintainer has responded.
    pub maintainer_response_days: Option<f64>,
    pub last_activity_at: DateTime<Utc>,
}

/// Score how active an issue is.
///
/// Starts from a baseline of 50 and adjusts for update recency, comment volume, and how quickly
/// the first owner/member/collaborator responded.
#[must_use]
pub fn assess_momentum(issue: &IssueSnapshot, comments: &[CommentRecord], now: DateTime<Utc>) -> MomentumAssessment {
    let days_since_update = days_between(issue.updated_at, now);
    let days_since_open = days_between(issue.created_at, now);

    let maintainer_response_days = comments
        .iter()
        .find(|c| c.author_association.is_maintainer())
        .map(|c| days_between(issue.created_at, c.created_at));

    let raw = BASELINE
        + recency_adjustment(days_since_update)
        + volume_adjustment(issue.comment_count)
        + responsiveness_adjustment(maintainer_response_days);

    let score = clamp_score(raw);

    let last_activity_at = comments
        .iter()
        .map(|c| c.created_at)
        .chain(core::iter::once(issue.updated_at))
        .max()
        .unwrap_or(issue.updated_at);

    MomentumAssessment {
        score,
        label: MomentumLabel::from_score(score),
        days_since_update,
        days_since_open,
        comment_count: issue.comment_count,
        maintainer_response_days,
        last_activity_at,
    }
}

fn recency_adjustment(days_since_update: f64) -> i32 {
    if days_since_update < 1.0 {
        25
    } else if days_since_update < 7.0 {
        15
    } else if days_since_update < 30.0 {
        5
    } else if days_since_update < 90.0 {
        -10
    } else {
        -30
    }
}

const fn volume_adjustment(comment_count: u64) -> i32 {
    match comment_count {
        0 => -15,
        1 => 0,
        2..=5 => 3,
        6..=10 => 8,
        _ => 15,
    }
}

fn responsiveness_adjustment(lag_days: Option<f64>) -> i32 {
    match lag_days {
        None => -15,
        Some(lag) if lag < 1.0 => 20,
        Some(lag) if lag < 7.0 => 10,
        Some(lag) if lag >= 30.0 => -10,
        Some(_) => 0,
    }
}

/// Fractional days from `from` to `to`; negative spans count as zero.
pub(crate) fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    #[expect(clippy::cast_precision_loss, reason = "second resolution is plenty for day counts")]
    let seconds = to.signed_duration_since(from).num_seconds().max(0) as f64;
    seconds / 86_400.0
}

pub(crate) fn clamp_score(raw: i32) -> u8 {
    u8::try_from(raw.clamp(0, 100)).unwrap_or(0)
}

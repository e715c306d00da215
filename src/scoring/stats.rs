//! Normalized projections of an evaluation for charting.

use crate::facts::text::{char_len, code_block_count, link_count};
use crate::scoring::{DifficultyAssessment, MomentumAssessment};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Number of days covered by [`comment_histogram`], today included.
pub const HISTOGRAM_DAYS: usize = 30;

/// Value used for an axis whose source assessment is absent.
const NEUTRAL_AXIS: u8 = 50;

/// Maintainer responsiveness when no maintainer has commented.
const NO_MAINTAINER_AXIS: u8 = 10;

/// Six axes, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatAxes {
    pub activity: u8,
    pub discussion: u8,
    pub maintainer_response: u8,
    pub pr_progress: u8,
    pub simplicity: u8,
    pub documentation: u8,
}

/// Comments posted on one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStats {
    pub axes: StatAxes,
    pub comment_histogram: Vec<DayBucket>,
}

/// What the axis projection reads.
#[derive(Debug, Clone, Copy)]
pub struct StatInput<'a> {
    pub momentum: Option<&'a MomentumAssessment>,
    pub difficulty: Option<&'a DifficultyAssessment>,
    pub comment_count: u64,
    pub pull_request_count: usize,
    pub body: &'a str,
}

#[must_use]
pub fn derive_axes(input: &StatInput<'_>) -> StatAxes {
    let activity = input
        .momentum
        .map_or(NEUTRAL_AXIS, |m| axis(100.0 - 3.0 * m.days_since_update));

    let maintainer_response = match input.momentum {
        Some(m) => m
            .maintainer_response_days
            .map_or(NO_MAINTAINER_AXIS, |lag| axis(100.0 - 4.0 * lag)),
        None => NEUTRAL_AXIS,
    };

    let simplicity = input.difficulty.map_or(NEUTRAL_AXIS, |d| 100 - d.score.min(100));

    let body_len = char_len(input.body) / 50;
    let documentation = body_len + 8 * code_block_count(input.body) + 5 * link_count(input.body);

    StatAxes {
        activity,
        discussion: capped(input.comment_count.saturating_mul(7)),
        maintainer_response,
        pr_progress: capped(u64::try_from(input.pull_request_count).unwrap_or(u64::MAX).saturating_mul(25)),
        simplicity,
        documentation: capped(u64::try_from(documentation).unwrap_or(u64::MAX)),
    }
}

/// Bin comment timestamps into [`HISTOGRAM_DAYS`] daily buckets ending at `today`.
///
/// The first bucket is `today - 29`; days with no comments are present with a zero count, and
/// timestamps outside the window are ignored.
#[must_use]
pub fn comment_histogram(timestamps: impl IntoIterator<Item = DateTime<Utc>>, today: NaiveDate) -> Vec<DayBucket> {
    let first = today - TimeDelta::days(29);
    let mut buckets: Vec<DayBucket> = first
        .iter_days()
        .take(HISTOGRAM_DAYS)
        .map(|date| DayBucket { date, count: 0 })
        .collect();

    for at in timestamps {
        let offset = at.date_naive().signed_duration_since(first).num_days();
        if let Some(bucket) = usize::try_from(offset).ok().and_then(|i| buckets.get_mut(i)) {
            bucket.count += 1;
        }
    }

    buckets
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "value is clamped to 0..=100")]
fn axis(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

fn capped(value: u64) -> u8 {
    u8::try_from(value.min(100)).unwrap_or(100)
}

//! Detection of comments that claim the issue.

use crate::facts::CommentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims older than this many hours are considered abandoned.
pub const STALE_AFTER_HOURS: f64 = 72.0;

/// Phrases that express intent to work on an issue, checked in order against lower-cased text.
pub const CLAIM_PHRASES: &[&str] = &[
    "i'd like to work on",
    "i would like to work on",
    "i'll work on",
    "i will work on",
    "i'm working on",
    "i am working on",
    "i'll take this",
    "i will take this",
    "i'll pick this up",
    "i'll give this a try",
    "can i work on",
    "could i work on",
    "may i work on",
    "can i take",
    "please assign",
    "assign this to me",
    "assign me",
    "i'm on it",
    "working on this",
    "claiming this",
];

/// A comment that claims the issue, aged relative to an evaluation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claimer: String,
    pub comment_url: String,
    pub claimed_at: DateTime<Utc>,
    pub keyword: String,
    pub age_hours: f64,
    pub is_stale: bool,
}

impl ClaimRecord {
    /// The same claim re-aged at a different instant.
    #[must_use]
    pub fn at(&self, now: DateTime<Utc>) -> Self {
        let age_hours = age_in_hours(self.claimed_at, now);
        Self {
            age_hours,
            is_stale: is_stale(age_hours),
            ..self.clone()
        }
    }
}

/// Hours elapsed since `claimed_at`, never negative.
#[must_use]
pub fn age_in_hours(claimed_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    #[expect(clippy::cast_precision_loss, reason = "second resolution is plenty for claim ages")]
    let seconds = now.signed_duration_since(claimed_at).num_seconds().max(0) as f64;
    seconds / 3600.0
}

#[must_use]
pub fn is_stale(age_hours: f64) -> bool {
    age_hours > STALE_AFTER_HOURS
}

/// The first claim phrase contained in `body`, if any.
#[must_use]
pub fn matching_phrase(body: &str) -> Option<&'static str> {
    let lowered = body.to_lowercase();
    CLAIM_PHRASES.iter().copied().find(|phrase| lowered.contains(phrase))
}

/// Find claim comments, most recent first.
///
/// Claims with equal timestamps keep their input order.
#[must_use]
pub fn detect_claims(comments: &[CommentRecord], now: DateTime<Utc>) -> Vec<ClaimRecord> {
    let mut claims: Vec<ClaimRecord> = comments
        .iter()
        .filter_map(|comment| {
            let keyword = matching_phrase(&comment.body)?;
            let age_hours = age_in_hours(comment.created_at, now);
            Some(ClaimRecord {
                claimer: comment.author.clone(),
                comment_url: comment.url.clone(),
                claimed_at: comment.created_at,
                keyword: keyword.to_string(),
                age_hours,
                is_stale: is_stale(age_hours),
            })
        })
        .collect();

    claims.sort_by(|a, b| b.claimed_at.cmp(&a.claimed_at));
    claims
}

/// The claim to feature in a badge: the most recent claim that is not stale.
///
/// Expects `claims` in the order produced by [`detect_claims`].
#[must_use]
pub fn freshest_active_claim(claims: &[ClaimRecord]) -> Option<&ClaimRecord> {
    claims.iter().find(|claim| !claim.is_stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::AuthorAssociation;
    use chrono::TimeDelta;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn comment(author: &str, body: &str, hours_ago: i64) -> CommentRecord {
        CommentRecord {
            author: author.to_string(),
            author_association: AuthorAssociation::Other,
            body: body.to_string(),
            created_at: now() - TimeDelta::hours(hours_ago),
            url: format!("https://github.com/a/b/issues/1#{author}"),
        }
    }

    #[test]
    fn test_detects_claim_phrase_case_insensitively() {
        let claims = detect_claims(&[comment("ann", "Hi! I'd LIKE to work on this.", 2)], now());
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].claimer, "ann");
        assert_eq!(claims[0].keyword, "i'd like to work on");
        assert!((claims[0].age_hours - 2.0).abs() < f64::EPSILON);
        assert!(!claims[0].is_stale);
    }

    #[test]
    fn test_non_claims_are_dropped() {
        let claims = detect_claims(&[comment("bob", "Is this still a problem?", 1)], now());
        assert!(claims.is_empty());
    }

    #[test]
    fn test_first_phrase_in_list_wins() {
        assert_eq!(matching_phrase("Assign this to me, please"), Some("assign this to me"));
        assert_eq!(matching_phrase("I'm working on this"), Some("i'm working on"));
    }

    #[test]
    fn test_staleness_threshold() {
        let claims = detect_claims(&[comment("a", "assign me", 72), comment("b", "assign me", 73)], now());
        let by_claimer = |name: &str| claims.iter().find(|c| c.claimer == name).unwrap();
        assert!(!by_claimer("a").is_stale, "exactly 72h is not stale");
        assert!(by_claimer("b").is_stale);
    }

    #[test]
    fn test_ordered_most_recent_first() {
        let comments = [
            comment("old", "can i work on this?", 100),
            comment("new", "can i work on this?", 1),
            comment("mid", "can i work on this?", 10),
        ];
        let claims = detect_claims(&comments, now());
        let order: Vec<_> = claims.iter().map(|c| c.claimer.as_str()).collect();
        assert_eq!(order, ["new", "mid", "old"]);
    }

    #[test]
    fn test_freshest_active_claim_skips_stale() {
        let comments = [comment("stale", "assign me", 200), comment("fresh", "assign me", 5)];
        let claims = detect_claims(&comments, now());
        assert_eq!(freshest_active_claim(&claims).unwrap().claimer, "fresh");

        let only_stale = detect_claims(&[comment("stale", "assign me", 200)], now());
        assert!(freshest_active_claim(&only_stale).is_none());
    }

    #[test]
    fn test_future_timestamp_has_zero_age() {
        let claims = detect_claims(&[comment("skew", "assign me", -3)], now());
        assert!(claims[0].age_hours.abs() < f64::EPSILON);
        assert!(!claims[0].is_stale);
    }

    #[test]
    fn test_staleness_is_monotonic_in_time() {
        let claim = detect_claims(&[comment("a", "assign me", 0)], now()).remove(0);

        let mut was_stale = false;
        let mut last_age = 0.0;
        for hour in 0..200 {
            let later = claim.at(now() + TimeDelta::hours(hour));
            assert!(later.age_hours >= last_age);
            assert!(!(was_stale && !later.is_stale), "stale claim became fresh at hour {hour}");
            was_stale = later.is_stale;
            last_age = later.age_hours;
        }
        assert!(was_stale);
    }
}

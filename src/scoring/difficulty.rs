//! Heuristic difficulty estimate with an explainable signal trail.
//!
//! Scoring is a fold over an ordered list of rules. Each rule receives the running [`Tally`]
//! and returns it with zero or more signals appended, so every rule can be tested in isolation
//! and the full evaluation is a pure function of its input.

use crate::facts::text::{char_len, code_block_count};
use crate::facts::{IssueSnapshot, Label};
use crate::scoring::momentum::clamp_score;
use serde::{Deserialize, Serialize};
use strum::Display;

const BASELINE: i32 = 50;

const BEGINNER_LABELS: &[&str] = &[
    "good first issue",
    "good-first-issue",
    "beginner",
    "beginner friendly",
    "beginner-friendly",
    "easy",
    "first-timers-only",
    "starter",
    "low-hanging-fruit",
];

/// Matched as substrings of the label name.
const COMPLEXITY_LABELS: &[&str] = &["complex", "hard", "difficult", "expert", "senior", "advanced", "architecture"];

const GENERAL_LABELS: &[&str] = &["enhancement", "bug", "feature"];

const HARD_KEYWORDS: &[&str] = &[
    "refactor",
    "architecture",
    "performance",
    "concurrency",
    "race condition",
    "deadlock",
    "memory leak",
    "security",
    "migration",
    "breaking change",
    "protocol",
    "algorithm",
    "optimization",
    "multithread",
    "compiler",
];

const EASY_KEYWORDS: &[&str] = &[
    "typo",
    "docs",
    "documentation",
    "readme",
    "spelling",
    "grammar",
    "rename",
    "broken link",
    "translation",
    "wording",
    "comment",
];

const HARD_KEYWORD_WEIGHT: i32 = 8;
const HARD_KEYWORD_CAP: i32 = 32;
const EASY_KEYWORD_WEIGHT: i32 = 7;
const EASY_KEYWORD_CAP: i32 = 28;

/// Five ordered difficulty bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DifficultyLevel {
    Beginner,
    EasyMedium,
    Medium,
    Hard,
    Expert,
}

impl DifficultyLevel {
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            0..28 => Self::Beginner,
            28..50 => Self::EasyMedium,
            50..68 => Self::Medium,
            68..82 => Self::Hard,
            _ => Self::Expert,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner Friendly",
            Self::EasyMedium => "Easy to Medium",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Expert => "Expert",
        }
    }

    #[must_use]
    pub const fn is_beginner_suitable(self) -> bool {
        matches!(self, Self::Beginner | Self::EasyMedium)
    }
}

/// Which way a signal pushes the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Polarity {
    Easier,
    Harder,
    Neutral,
}

/// One rule firing: what it saw and how much it moved the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub polarity: Polarity,
    pub text: String,
    pub delta: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyAssessment {
    /// 0..=100
    pub score: u8,
    pub level: DifficultyLevel,
    pub label: String,
    pub can_beginner: bool,
    pub signals: Vec<Signal>,
}

/// Everything the difficulty rules look at.
#[derive(Debug, Clone, Copy)]
pub struct DifficultyInput<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub labels: &'a [Label],
    pub comment_count: u64,
    pub prior_attempts: usize,
}

impl<'a> DifficultyInput<'a> {
    #[must_use]
    pub fn from_issue(issue: &'a IssueSnapshot, prior_attempts: usize) -> Self {
        Self {
            title: &issue.title,
            body: &issue.body,
            labels: &issue.labels,
            comment_count: issue.comment_count,
            prior_attempts,
        }
    }

    /// Input for an issue whose details could not be fetched.
    #[must_use]
    pub const fn unknown(prior_attempts: usize) -> Self {
        Self {
            title: "",
            body: "",
            labels: &[],
            comment_count: 0,
            prior_attempts,
        }
    }
}

/// Running score and the signals that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub score: i32,
    pub signals: Vec<Signal>,
}

impl Tally {
    #[must_use]
    pub const fn baseline() -> Self {
        Self {
            score: BASELINE,
            signals: Vec::new(),
        }
    }

    #[must_use]
    fn with(mut self, polarity: Polarity, text: impl Into<String>, delta: i32) -> Self {
        self.score += delta;
        self.signals.push(Signal {
            polarity,
            text: text.into(),
            delta,
        });
        self
    }
}

type Rule = fn(&DifficultyInput<'_>, Tally) -> Tally;

/// Evaluation order is part of the output: signals appear in this order.
const RULES: &[Rule] = &[
    label_rule,
    keyword_rule,
    body_length_rule,
    discussion_rule,
    prior_attempt_rule,
    code_block_rule,
];

#[must_use]
pub fn assess_difficulty(input: &DifficultyInput<'_>) -> DifficultyAssessment {
    let tally = RULES.iter().fold(Tally::baseline(), |tally, rule| rule(input, tally));

    let score = clamp_score(tally.score);
    let level = DifficultyLevel::from_score(score);

    DifficultyAssessment {
        score,
        level,
        label: level.label().to_string(),
        can_beginner: level.is_beginner_suitable(),
        signals: tally.signals,
    }
}

fn label_rule(input: &DifficultyInput<'_>, tally: Tally) -> Tally {
    let names: Vec<String> = input.labels.iter().map(|l| l.name.to_lowercase()).collect();

    let beginner = names.iter().find(|n| BEGINNER_LABELS.contains(&n.as_str()));
    let complex = names.iter().find(|n| COMPLEXITY_LABELS.iter().any(|c| n.contains(c)));
    let general = names.iter().find(|n| GENERAL_LABELS.contains(&n.as_str()));

    let mut tally = tally;
    if let Some(name) = beginner {
        tally = tally.with(Polarity::Easier, format!("Labeled '{name}'"), -25);
    }
    if let Some(name) = complex {
        tally = tally.with(Polarity::Harder, format!("Labeled '{name}'"), 30);
    }
    if let Some(name) = general {
        tally = tally.with(Polarity::Neutral, format!("Labeled '{name}'"), 5);
    }
    tally
}

fn keyword_rule(input: &DifficultyInput<'_>, tally: Tally) -> Tally {
    let text = format!("{} {}", input.title, input.body).to_lowercase();

    let hard = matched_keywords(&text, HARD_KEYWORDS);
    let easy = matched_keywords(&text, EASY_KEYWORDS);

    let mut tally = tally;
    if !hard.is_empty() {
        let delta = keyword_delta(hard.len(), HARD_KEYWORD_WEIGHT, HARD_KEYWORD_CAP);
        tally = tally.with(Polarity::Harder, format!("Mentions {}", hard.join(", ")), delta);
    }
    if !easy.is_empty() {
        let delta = keyword_delta(easy.len(), EASY_KEYWORD_WEIGHT, EASY_KEYWORD_CAP);
        tally = tally.with(Polarity::Easier, format!("Mentions {}", easy.join(", ")), -delta);
    }
    tally
}

fn matched_keywords(text: &str, keywords: &[&'static str]) -> Vec<&'static str> {
    keywords.iter().copied().filter(|k| text.contains(k)).collect()
}

fn keyword_delta(matches: usize, weight: i32, cap: i32) -> i32 {
    i32::try_from(matches).map_or(cap, |n| n.saturating_mul(weight).min(cap))
}

fn body_length_rule(input: &DifficultyInput<'_>, tally: Tally) -> Tally {
    let len = char_len(input.body);
    if len > 3000 {
        tally.with(Polarity::Harder, format!("Very long description ({len} chars)"), 12)
    } else if len > 1000 {
        tally.with(Polarity::Harder, format!("Long description ({len} chars)"), 5)
    } else if len < 200 {
        tally.with(Polarity::Easier, format!("Short description ({len} chars)"), -5)
    } else {
        tally
    }
}

fn discussion_rule(input: &DifficultyInput<'_>, tally: Tally) -> Tally {
    let count = input.comment_count;
    if count > 20 {
        tally.with(Polarity::Harder, format!("Extensive discussion ({count} comments)"), 15)
    } else if count > 8 {
        tally.with(Polarity::Harder, format!("Active discussion ({count} comments)"), 7)
    } else {
        tally
    }
}

fn prior_attempt_rule(input: &DifficultyInput<'_>, tally: Tally) -> Tally {
    let attempts = input.prior_attempts;
    if attempts > 2 {
        tally.with(Polarity::Harder, format!("{attempts} previous pull requests"), 18)
    } else if attempts > 0 {
        tally.with(Polarity::Harder, format!("{attempts} previous pull request(s)"), 8)
    } else {
        tally
    }
}

fn code_block_rule(input: &DifficultyInput<'_>, tally: Tally) -> Tally {
    let blocks = code_block_count(input.body);
    if blocks > 3 {
        tally.with(Polarity::Harder, format!("{blocks} code blocks in description"), 10)
    } else {
        tally
    }
}

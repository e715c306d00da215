//! Pure scoring over gathered facts and signals.

mod difficulty;
mod momentum;
mod stats;
mod status;

pub use difficulty::{DifficultyAssessment, DifficultyInput, DifficultyLevel, Polarity, Signal, Tally, assess_difficulty};
pub use momentum::{MomentumAssessment, MomentumLabel, assess_momentum};
pub use stats::{DayBucket, HISTOGRAM_DAYS, IssueStats, StatAxes, StatInput, comment_histogram, derive_axes};
pub use status::{ContributionStatus, StatusColor, resolve_status};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fork of the issue's repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkInfo {
    pub url: String,

    /// `owner/repo` of the fork, used to list its branches.
    pub full_name: String,
    pub owner_login: String,
    pub created_at: DateTime<Utc>,
    pub pushed_at: DateTime<Utc>,
}

/// A recently pushed fork with a branch that looks related to the issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkMatch {
    pub fork_url: String,
    pub owner_login: String,
    pub branch: String,
    pub pushed_at: DateTime<Utc>,
}

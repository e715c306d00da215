use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// The relationship of a comment author to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuthorAssociation {
    Owner,
    Member,
    Collaborator,
    Other,
}

impl AuthorAssociation {
    /// Map the API's `author_association` value; anything unrecognized is `Other`.
    #[must_use]
    pub fn from_api(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "OWNER" => Self::Owner,
            "MEMBER" => Self::Member,
            "COLLABORATOR" => Self::Collaborator,
            _ => Self::Other,
        }
    }

    /// Returns `true` for roles that can speak for the project.
    #[must_use]
    pub const fn is_maintainer(self) -> bool {
        matches!(self, Self::Owner | Self::Member | Self::Collaborator)
    }
}

/// A comment-like record: either an API comment or one scraped from the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub author: String,
    pub author_association: AuthorAssociation,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
}

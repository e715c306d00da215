//! The data model: issues, comments, pull request references, and forks.

mod comment_record;
mod fork;
mod issue_ref;
mod issue_snapshot;
pub mod payload;
mod pull_request_ref;
pub mod text;

pub use comment_record::{AuthorAssociation, CommentRecord};
pub use fork::{ForkInfo, ForkMatch};
pub use issue_ref::IssueRef;
pub use issue_snapshot::{IssueSnapshot, Label};
pub use pull_request_ref::{Provenance, PullRequestRef};

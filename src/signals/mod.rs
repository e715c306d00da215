//! Signals gathered around an issue: claims, fork activity, pull requests, and assignee load.

pub mod claims;
pub mod forks;
pub mod pulls;
mod workload;

pub use claims::{ClaimRecord, detect_claims, freshest_active_claim};
pub use forks::find_active_forks;
pub use pulls::dedupe_pull_requests;
pub use workload::AssigneeWorkload;

//! Remote access to the GitHub REST API.

mod endpoints;
mod error;
mod github_client;

pub use endpoints::{Endpoints, PER_PAGE};
pub use error::TransportError;
pub use github_client::GitHubClient;

use serde_json::Value;
use url::Url;

/// Fetches a JSON document from a URL.
///
/// Authentication, headers, and status-code mapping belong to the implementation.
pub trait Transport: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

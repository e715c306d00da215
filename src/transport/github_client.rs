use super::{Transport, TransportError};
use chrono::{DateTime, Utc};
use core::time::Duration;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

/// Log target for the GitHub client
const LOG_TARGET: &str = "github";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const API_VERSION: &str = "2022-11-28";

/// `reqwest`-backed transport for the GitHub REST API.
///
/// Works unauthenticated when no token is given, at the lower anonymous rate limit.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    user_agent: String,
}

impl GitHubClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(token: Option<String>, user_agent: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            token: token.filter(|t| !t.trim().is_empty()),
            user_agent: user_agent.into(),
        })
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl Transport for GitHubClient {
    async fn fetch(&self, url: &Url) -> Result<Value, TransportError> {
        log::debug!(target: LOG_TARGET, "GET {url}");

        let mut request = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(USER_AGENT, &self.user_agent);

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            let err = classify_failure(status, response.headers(), url);
            log::debug!(target: LOG_TARGET, "GET {url} failed: {err}");
            return Err(err);
        }

        response.json::<Value>().await.map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Map a non-2xx response onto the transport failure taxonomy.
fn classify_failure(status: StatusCode, headers: &HeaderMap, url: &Url) -> TransportError {
    if status == StatusCode::UNAUTHORIZED {
        return TransportError::Unauthorized;
    }

    let remaining = header_u64(headers, "x-ratelimit-remaining");
    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && remaining.is_some());

    if rate_limited {
        let reset_at = header_u64(headers, "x-ratelimit-reset")
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        return TransportError::RateLimited {
            remaining: remaining.unwrap_or(0),
            reset_at,
        };
    }

    TransportError::Api {
        status: status.as_u16(),
        url: url.to_string(),
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure kinds raised by the transport collaborator.
///
/// The engine treats every variant as a soft failure of the component that issued the request.
/// Values are `Clone` so that a single failed load can be handed to every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// HTTP 401: the credential was rejected.
    #[error("the GitHub token was rejected (HTTP 401)")]
    Unauthorized,

    /// HTTP 403/429 carrying rate-limit headers.
    #[error("GitHub rate limit exceeded ({remaining} requests remaining{})", reset_suffix(.reset_at.as_ref()))]
    RateLimited { remaining: u64, reset_at: Option<DateTime<Utc>> },

    /// Any other non-2xx status.
    #[error("GitHub API request to '{url}' failed with HTTP {status}")]
    Api { status: u16, url: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be interpreted.
    #[error("unexpected response payload: {0}")]
    Decode(String),
}

fn reset_suffix(reset_at: Option<&DateTime<Utc>>) -> String {
    reset_at.map_or_else(String::new, |at| format!(", resets at {}", at.format("%H:%M:%S UTC")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message_includes_reset() {
        let reset_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let err = TransportError::RateLimited {
            remaining: 0,
            reset_at: Some(reset_at),
        };
        let message = err.to_string();
        assert!(message.contains("0 requests remaining"), "got: {message}");
        assert!(message.contains("resets at 22:13:20 UTC"), "got: {message}");
    }

    #[test]
    fn test_rate_limited_message_without_reset() {
        let err = TransportError::RateLimited {
            remaining: 3,
            reset_at: None,
        };
        assert_eq!(err.to_string(), "GitHub rate limit exceeded (3 requests remaining)");
    }

    #[test]
    fn test_api_message_includes_status() {
        let err = TransportError::Api {
            status: 502,
            url: "https://api.github.com/x".to_string(),
        };
        assert!(err.to_string().contains("HTTP 502"));
    }
}

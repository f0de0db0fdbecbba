//! Errors raised while talking to the recommendation service.

use crate::api::models::Endpoint;
use thiserror::Error;

/// Failure of a single request to the recommendation service.
///
/// Every variant is treated the same way by the UI (logged, previous state
/// kept); the split exists so log lines say what actually went wrong.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or body transfer failure
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a non-success status
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: reqwest::StatusCode,
        body: String,
    },

    /// Body was not valid JSON, or did not match the expected records
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    /// Body was valid JSON of the wrong kind (e.g. an object instead of a list)
    #[error("{endpoint} returned {found} where a list was expected")]
    UnexpectedShape { endpoint: Endpoint, found: &'static str },
}

impl ApiError {
    /// True when the request timed out rather than failing outright.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport { source, .. } if source.is_timeout())
    }
}

//! Typed errors for the discovery library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during discovery operations.
///
/// The pipeline contract is degrade-to-empty: the only error the
/// orchestrator surfaces to callers is `InvalidZone`, raised before any
/// network activity. Everything else is contained and logged.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Zone descriptor failed validation (empty name, polygon under 3 points)
    #[error("invalid zone: {reason}")]
    InvalidZone { reason: String },

    /// Cache storage operation failed
    #[error("cache error: {0}")]
    Cache(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while fetching from a single source.
///
/// These never cross the adapter boundary: adapters catch them, log, and
/// yield zero candidates for that source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Remote endpoint returned a non-success status
    #[error("unexpected status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    /// Response body could not be parsed
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// No document could be resolved for the zone's place name
    #[error("no document found for: {name}")]
    DocumentNotFound { name: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl SourceError {
    /// Whether this error is worth exactly one retry.
    ///
    /// Connection-level failures (reset, timeout, abort) are transient;
    /// protocol-level failures (bad status, unparsable body) are not.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Http(inner) => {
                if let Some(e) = inner.downcast_ref::<reqwest::Error>() {
                    e.is_timeout() || e.is_connect()
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Http(Box::new(e))
    }
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Result type alias for source fetch operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

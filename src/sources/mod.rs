//! Source adapter implementations.

pub mod mock;
pub mod overpass;
pub mod wikidata;
pub mod wikipedia;

pub use mock::MockSource;
pub use overpass::OverpassSource;
pub use wikidata::WikidataSource;
pub use wikipedia::WikipediaSource;

use tracing::warn;

use crate::error::{SourceError, SourceResult};
use crate::limiter::SourceRateLimiter;
use crate::types::candidate::Source;

/// User agent sent with every outbound request.
pub(crate) const USER_AGENT: &str = "zone-poi-discovery/0.1 (contact: ops@localhost)";

/// Default per-request timeout for source endpoints.
pub(crate) const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Build the shared HTTP client used by all adapters.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_default()
}

/// Parse an adapter endpoint, rejecting anything that is not an absolute
/// URL before a request is attempted.
pub(crate) fn parse_endpoint(raw: &str) -> SourceResult<url::Url> {
    url::Url::parse(raw).map_err(|_| SourceError::InvalidUrl {
        url: raw.to_string(),
    })
}

/// Send a request with rate limiting and exactly one retry on transient
/// network failure.
///
/// Waits on the shared limiter before each attempt, so the retry gets the
/// limiter's natural spacing rather than an extra backoff. A second
/// failure, or any non-transient failure, is the source's problem to log.
pub(crate) async fn send_with_retry<F>(
    limiter: &SourceRateLimiter,
    source: Source,
    build: F,
) -> SourceResult<reqwest::Response>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    limiter.wait(source).await;
    match send_once(build()).await {
        Ok(response) => Ok(response),
        Err(e) if e.is_transient() => {
            warn!(source = %source, error = %e, "transient failure, retrying once");
            limiter.wait(source).await;
            send_once(build()).await
        }
        Err(e) => Err(e),
    }
}

async fn send_once(request: reqwest::RequestBuilder) -> SourceResult<reqwest::Response> {
    let response = request.send().await.map_err(SourceError::from)?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            status: status.as_u16(),
            endpoint: response.url().to_string(),
        });
    }
    Ok(response)
}

//! Per-source rate limiting.
//!
//! One governor limiter per external source, shared process-wide so that
//! concurrent discovery runs still queue behind the same per-source
//! spacing. Built with the governor crate, as a minimum inter-request
//! period rather than a requests-per-second quota.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use crate::types::candidate::Source;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Default minimum spacing between requests to the text corpus.
const DEFAULT_WIKIPEDIA_SPACING: Duration = Duration::from_millis(1200);

/// Default minimum spacing between requests to the knowledge graph.
const DEFAULT_WIKIDATA_SPACING: Duration = Duration::from_millis(1000);

/// Default minimum spacing between requests to the map-feature service.
const DEFAULT_OVERPASS_SPACING: Duration = Duration::from_millis(1500);

/// Enforces a minimum inter-request spacing per external source.
///
/// This is the sole concurrency-control primitive for outbound calls:
/// adapters call [`wait`](SourceRateLimiter::wait) before every request.
/// Governor's atomic state serializes concurrent waiters on the same
/// source, so two runs can never issue sub-threshold-spaced requests.
///
/// Share one instance across all adapters via `Arc`:
///
/// ```rust,ignore
/// let limiter = Arc::new(SourceRateLimiter::new());
/// let wikipedia = WikipediaSource::new(Arc::clone(&limiter));
/// ```
pub struct SourceRateLimiter {
    limiters: HashMap<Source, DirectRateLimiter>,
}

impl Default for SourceRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRateLimiter {
    /// Create a limiter with the default per-source spacing.
    pub fn new() -> Self {
        Self::with_spacing([
            (Source::Wikipedia, DEFAULT_WIKIPEDIA_SPACING),
            (Source::Wikidata, DEFAULT_WIKIDATA_SPACING),
            (Source::Overpass, DEFAULT_OVERPASS_SPACING),
        ])
    }

    /// Create a limiter with explicit per-source spacing.
    ///
    /// Sources not listed get no limiter and pass through unthrottled.
    pub fn with_spacing(spacing: impl IntoIterator<Item = (Source, Duration)>) -> Self {
        let limiters = spacing
            .into_iter()
            .map(|(source, period)| {
                let quota = Quota::with_period(period)
                    .expect("spacing must be non-zero");
                (source, RateLimiter::direct(quota))
            })
            .collect();
        Self { limiters }
    }

    /// Suspend until a request to `source` respects its minimum spacing.
    pub async fn wait(&self, source: Source) {
        if let Some(limiter) = self.limiters.get(&source) {
            trace!(source = %source, "waiting for rate limit permit");
            limiter.until_ready().await;
        }
    }
}

/// Convenience alias for the shared form adapters hold.
pub type SharedRateLimiter = Arc<SourceRateLimiter>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_spacing_enforced_between_requests() {
        let limiter =
            SourceRateLimiter::with_spacing([(Source::Overpass, Duration::from_millis(200))]);

        let start = Instant::now();
        limiter.wait(Source::Overpass).await;
        limiter.wait(Source::Overpass).await;
        limiter.wait(Source::Overpass).await;
        let elapsed = start.elapsed();

        // First permit is immediate, the next two each wait the period.
        assert!(elapsed >= Duration::from_millis(350), "too fast: {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_sources_limited_independently() {
        let limiter = SourceRateLimiter::with_spacing([
            (Source::Wikipedia, Duration::from_millis(500)),
            (Source::Wikidata, Duration::from_millis(500)),
        ]);

        let start = Instant::now();
        limiter.wait(Source::Wikipedia).await;
        limiter.wait(Source::Wikidata).await;
        let elapsed = start.elapsed();

        // Different sources do not queue behind each other.
        assert!(elapsed < Duration::from_millis(400), "cross-source stall: {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_shared_limiter_serializes_concurrent_runs() {
        let limiter = Arc::new(SourceRateLimiter::with_spacing([(
            Source::Wikidata,
            Duration::from_millis(200),
        )]));

        let start = Instant::now();
        let a = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move { limiter.wait(Source::Wikidata).await })
        };
        let b = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move { limiter.wait(Source::Wikidata).await })
        };
        a.await.unwrap();
        b.await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(150));
    }
}

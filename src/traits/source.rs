//! PoiSource trait for pluggable candidate sources.
//!
//! The three fetch strategies are structurally different (article section
//! mining, structured graph query, tagged-feature query) but share one
//! capability: turn a zone into raw candidates. Implement the trait, not
//! an inheritance hierarchy.

use async_trait::async_trait;

use crate::types::{candidate::RawCandidate, candidate::Source, zone::ZoneDescriptor};

/// A source-specific fetch-and-parse component.
///
/// # Contract
///
/// `fetch` never fails: internal errors (network, quota, malformed
/// responses) are caught, logged, and turn into an empty list for that
/// source only. One source going dark must never abort a pipeline run.
///
/// Implementations rate-limit themselves: every outbound request goes
/// through the shared [`SourceRateLimiter`](crate::SourceRateLimiter)
/// first.
#[async_trait]
pub trait PoiSource: Send + Sync {
    /// The provenance tag for candidates from this source.
    fn source(&self) -> Source;

    /// Fetch raw candidates for the zone.
    ///
    /// Returns an empty vector on any internal failure.
    async fn fetch(&self, zone: &ZoneDescriptor) -> Vec<RawCandidate>;

    /// Source name for logging.
    fn name(&self) -> &'static str {
        self.source().as_str()
    }
}

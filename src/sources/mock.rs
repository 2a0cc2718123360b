//! Mock source for testing.
//!
//! Returns scripted candidates and records the zones it was asked about.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::traits::source::PoiSource;
use crate::types::{
    candidate::{RawCandidate, Source},
    zone::ZoneDescriptor,
};

/// Configurable mock implementation of [`PoiSource`].
///
/// # Example
///
/// ```rust
/// use discovery::sources::MockSource;
/// use discovery::types::{RawCandidate, Source};
///
/// let mock = MockSource::new(Source::Overpass)
///     .with_candidate(RawCandidate::new("Castello Brown", Source::Overpass));
/// ```
pub struct MockSource {
    source: Source,
    candidates: Arc<RwLock<Vec<RawCandidate>>>,
    fetch_calls: Arc<RwLock<Vec<String>>>,
}

impl MockSource {
    /// Create an empty mock posing as the given source.
    pub fn new(source: Source) -> Self {
        Self {
            source,
            candidates: Arc::new(RwLock::new(Vec::new())),
            fetch_calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Add a scripted candidate (builder pattern).
    pub fn with_candidate(self, candidate: RawCandidate) -> Self {
        self.candidates.write().unwrap().push(candidate);
        self
    }

    /// Add multiple scripted candidates (builder pattern).
    pub fn with_candidates(self, candidates: impl IntoIterator<Item = RawCandidate>) -> Self {
        self.candidates.write().unwrap().extend(candidates);
        self
    }

    /// Number of times fetch was called.
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.read().unwrap().len()
    }

    /// Zone names fetch was called with, in order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.read().unwrap().clone()
    }
}

impl Clone for MockSource {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            candidates: Arc::clone(&self.candidates),
            fetch_calls: Arc::clone(&self.fetch_calls),
        }
    }
}

#[async_trait]
impl PoiSource for MockSource {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch(&self, zone: &ZoneDescriptor) -> Vec<RawCandidate> {
        self.fetch_calls.write().unwrap().push(zone.name.clone());
        self.candidates.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::zone::Coordinate;

    #[tokio::test]
    async fn test_mock_returns_scripted_candidates_and_tracks_calls() {
        let mock = MockSource::new(Source::Wikidata)
            .with_candidate(RawCandidate::new("Castello", Source::Wikidata));
        let zone = ZoneDescriptor::new(
            "Portofino",
            vec![
                Coordinate::new(44.0, 9.0),
                Coordinate::new(44.0, 9.1),
                Coordinate::new(44.1, 9.1),
            ],
        );

        let fetched = mock.fetch(&zone).await;
        assert_eq!(fetched.len(), 1);
        assert_eq!(mock.fetch_call_count(), 1);
        assert_eq!(mock.fetch_calls(), vec!["Portofino"]);
    }
}

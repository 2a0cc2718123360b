//! The Discovery orchestrator - main entry point for the library.
//!
//! Sequences the full run: validate input, consult the cache (with the
//! active validity gate), fetch each source in fixed order, apply the
//! quality filter, the exact zone-boundary filter, and deduplication,
//! normalize the output shape, and write the result back to the cache.
//!
//! # Contract
//!
//! The pipeline never fails past input validation. Source outages, cache
//! trouble, and filter surprises all degrade to a smaller (possibly empty)
//! result carrying warnings, so the downstream curation workflow stays
//! operable even when every enrichment source is dark.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{CachedResults, DefaultValidity};
use crate::dedup::Deduplicator;
use crate::error::Result;
use crate::filter::QualityFilter;
use crate::geo::contains;
use crate::health::HealthProbe;
use crate::text::{clean_description, clean_name};
use crate::traits::{
    cache::{CacheValidity, ResultCache},
    source::PoiSource,
};
use crate::types::{
    candidate::{Category, PoiCandidate, RawCandidate, Source},
    config::{DiscoveryConfig, DiscoveryMode, SearchOptions},
    result::DiscoveryResult,
    zone::ZoneDescriptor,
};

/// The main entry point.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use discovery::{Discovery, MemoryCache, SourceRateLimiter};
/// use discovery::sources::{OverpassSource, WikidataSource, WikipediaSource};
///
/// let limiter = Arc::new(SourceRateLimiter::new());
/// let discovery = Discovery::builder(MemoryCache::new())
///     .with_source(Arc::new(WikipediaSource::new(Arc::clone(&limiter))))
///     .with_source(Arc::new(WikidataSource::new(Arc::clone(&limiter))))
///     .with_source(Arc::new(OverpassSource::new(limiter)))
///     .build();
///
/// let result = discovery.discover(&zone, &SearchOptions::new()).await?;
/// ```
pub struct Discovery<C: ResultCache, V: CacheValidity> {
    sources: Vec<Arc<dyn PoiSource>>,
    cache: CachedResults<C, V>,
    filter: QualityFilter,
    dedup: Deduplicator,
    marine_excluded: Vec<Source>,
    health: Option<HealthProbe>,
}

impl<C: ResultCache> Discovery<C, DefaultValidity> {
    /// Start building a pipeline over a cache store, with the default
    /// validity gate and configuration.
    pub fn builder(cache: C) -> DiscoveryBuilder<C, DefaultValidity> {
        DiscoveryBuilder {
            sources: Vec::new(),
            cache,
            validity: DefaultValidity::default(),
            config: DiscoveryConfig::default(),
            health: None,
        }
    }
}

/// Builder for [`Discovery`].
pub struct DiscoveryBuilder<C: ResultCache, V: CacheValidity> {
    sources: Vec<Arc<dyn PoiSource>>,
    cache: C,
    validity: V,
    config: DiscoveryConfig,
    health: Option<HealthProbe>,
}

impl<C: ResultCache, V: CacheValidity> DiscoveryBuilder<C, V> {
    /// Append a source. Fetch order is registration order.
    pub fn with_source(mut self, source: Arc<dyn PoiSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Replace the cache validity gate.
    pub fn with_validity<V2: CacheValidity>(self, validity: V2) -> DiscoveryBuilder<C, V2> {
        DiscoveryBuilder {
            sources: self.sources,
            cache: self.cache,
            validity,
            config: self.config,
            health: self.health,
        }
    }

    /// Replace the pipeline configuration.
    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach an availability probe for the enrichment service.
    pub fn with_health_probe(mut self, probe: HealthProbe) -> Self {
        self.health = Some(probe);
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Discovery<C, V> {
        Discovery {
            sources: self.sources,
            cache: CachedResults::new(self.cache, self.validity, self.config.cache_max_age_secs),
            filter: QualityFilter::new(self.config.filter),
            dedup: Deduplicator::new(self.config.dedup_threshold_m),
            marine_excluded: self.config.marine_excluded_sources,
            health: self.health,
        }
    }
}

impl<C: ResultCache, V: CacheValidity> Discovery<C, V> {
    /// Run the discovery pipeline for a zone.
    ///
    /// The only error is `InvalidZone`, raised before any network
    /// activity. Everything downstream degrades to warnings.
    pub async fn discover(
        &self,
        zone: &ZoneDescriptor,
        options: &SearchOptions,
    ) -> Result<DiscoveryResult> {
        zone.validate()?;

        match self.cache.lookup(zone, options).await {
            Ok(Some(hit)) => {
                info!(zone = %zone.name, candidates = hit.candidates.len(), "cache hit");
                return Ok(hit);
            }
            Ok(None) => {}
            Err(e) => {
                // A broken cache never blocks a run.
                warn!(zone = %zone.name, error = %e, "cache lookup failed, fetching fresh");
            }
        }

        let mut result = self.run_fresh(zone, options).await;

        if let Err(e) = self.cache.store(zone, options, &result).await {
            warn!(zone = %zone.name, error = %e, "failed to cache result");
            result.warn(format!("result not cached: {}", e));
        }

        Ok(result)
    }

    /// Fetch, filter, and normalize without consulting the cache.
    async fn run_fresh(&self, zone: &ZoneDescriptor, options: &SearchOptions) -> DiscoveryResult {
        let mut result = DiscoveryResult::empty();

        if options.mode == DiscoveryMode::Enhanced {
            let available = match &self.health {
                Some(probe) => probe.is_available().await,
                None => false,
            };
            if !available {
                warn!(zone = %zone.name, "enrichment service unavailable, degrading to standard sources");
                result.warn("enrichment service unavailable, ran standard sources only");
            }
        }

        // Fetch each source sequentially: the shared per-source limiter is
        // the serialization point, so parallel fetches would gain nothing.
        let mut raw: Vec<RawCandidate> = Vec::new();
        for source in &self.sources {
            // Marine-only runs exclude land-heritage sources up front;
            // their provenance would fail the cache validity gate anyway.
            if options.marine_only && self.marine_excluded.contains(&source.source()) {
                debug!(source = source.name(), "skipping source for marine-only run");
                continue;
            }
            let fetched = source.fetch(zone).await;
            debug!(source = source.name(), count = fetched.len(), "source fetch complete");
            if fetched.is_empty() {
                result.warn(format!("source {} contributed no candidates", source.name()));
            }
            raw.extend(fetched);
        }

        let (filtered, rejected) = self.filter.apply(raw);
        result.stats.discarded_by_filter = rejected;

        // Exact zone-boundary filter. Approximate-location candidates
        // inherited the zone center and are exempt by definition.
        let before_boundary = filtered.len();
        let bounded: Vec<RawCandidate> = filtered
            .into_iter()
            .filter(|c| {
                c.approximate_location
                    || c.coordinate()
                        .map(|p| contains(p, &zone.polygon))
                        .unwrap_or(false)
            })
            .collect();
        result.stats.discarded_by_boundary = before_boundary - bounded.len();

        let (unique, merged) = self.dedup.apply(bounded);
        result.stats.merged_duplicates = merged;

        let candidates: Vec<PoiCandidate> = unique
            .into_iter()
            .filter_map(|c| normalize(c, zone))
            .collect();
        result.stats.tally(&candidates);
        result.candidates = candidates;

        info!(
            zone = %zone.name,
            total = result.stats.total_candidates,
            filtered = result.stats.discarded_by_filter,
            out_of_bounds = result.stats.discarded_by_boundary,
            merged = result.stats.merged_duplicates,
            "discovery run complete"
        );
        result
    }
}

/// Normalize a surviving raw candidate into the output shape.
///
/// Candidates that lost their coordinates along the way (should not happen
/// past the quality filter) are dropped rather than emitted malformed.
fn normalize(candidate: RawCandidate, zone: &ZoneDescriptor) -> Option<PoiCandidate> {
    let point = candidate.coordinate()?;
    let category = candidate
        .category_hint
        .as_deref()
        .map(Category::from_hint)
        .unwrap_or(Category::Other);

    Some(PoiCandidate {
        name: clean_name(&candidate.name),
        description: clean_description(&candidate.description),
        lat: point.lat,
        lng: point.lng,
        category,
        source: candidate.source,
        zone_name: zone.name.clone(),
        location_context: zone.location_context().to_string(),
        approximate_location: candidate.approximate_location,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::sources::MockSource;
    use crate::types::candidate::Source;
    use crate::types::zone::Coordinate;

    fn zone() -> ZoneDescriptor {
        ZoneDescriptor::new(
            "Portofino",
            vec![
                Coordinate::new(44.0, 9.0),
                Coordinate::new(44.0, 9.1),
                Coordinate::new(44.1, 9.1),
                Coordinate::new(44.1, 9.0),
            ],
        )
    }

    fn inside(name: &str, source: Source) -> RawCandidate {
        RawCandidate::new(name, source)
            .with_coordinates(44.05, 9.05)
            .with_category_hint("monument")
    }

    #[tokio::test]
    async fn test_invalid_zone_rejected_before_fetch() {
        let mock = MockSource::new(Source::Overpass);
        let discovery = Discovery::builder(MemoryCache::new())
            .with_source(Arc::new(mock.clone()))
            .build();

        let bad = ZoneDescriptor::new("", zone().polygon);
        assert!(discovery.discover(&bad, &SearchOptions::new()).await.is_err());
        assert_eq!(mock.fetch_call_count(), 0);
    }

    #[tokio::test]
    async fn test_boundary_filter_drops_outside_candidates() {
        let mock = MockSource::new(Source::Overpass)
            .with_candidate(inside("Castello Brown", Source::Overpass))
            .with_candidate(
                RawCandidate::new("Far Away Tower", Source::Overpass)
                    .with_coordinates(45.0, 10.0)
                    .with_category_hint("monument"),
            );
        let discovery = Discovery::builder(MemoryCache::new())
            .with_source(Arc::new(mock))
            .build();

        let result = discovery.discover(&zone(), &SearchOptions::new()).await.unwrap();
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].name, "Castello Brown");
        assert_eq!(result.stats.discarded_by_boundary, 1);
    }

    #[tokio::test]
    async fn test_approximate_candidates_bypass_boundary() {
        // Text-corpus candidates inherit the zone center; even if the
        // polygon were odd, the approximate flag exempts them.
        let candidate = RawCandidate::new("Chiesa di San Giorgio", Source::Wikipedia)
            .with_description("x".repeat(60))
            .with_approximate_coordinates(Coordinate::new(44.05, 9.05));
        let discovery = Discovery::builder(MemoryCache::new())
            .with_source(Arc::new(
                MockSource::new(Source::Wikipedia).with_candidate(candidate),
            ))
            .build();

        let result = discovery.discover(&zone(), &SearchOptions::new()).await.unwrap();
        assert_eq!(result.candidates.len(), 1);
        assert!(result.candidates[0].approximate_location);
    }

    #[tokio::test]
    async fn test_second_run_served_from_cache() {
        let mock =
            MockSource::new(Source::Overpass).with_candidate(inside("Castello Brown", Source::Overpass));
        let discovery = Discovery::builder(MemoryCache::new())
            .with_source(Arc::new(mock.clone()))
            .build();

        let options = SearchOptions::new();
        let first = discovery.discover(&zone(), &options).await.unwrap();
        let second = discovery.discover(&zone(), &options).await.unwrap();

        assert_eq!(first.candidates, second.candidates);
        assert_eq!(mock.fetch_call_count(), 1);
    }

    #[tokio::test]
    async fn test_enhanced_mode_without_probe_degrades_with_warning() {
        let discovery = Discovery::builder(MemoryCache::new())
            .with_source(Arc::new(MockSource::new(Source::Overpass)))
            .build();

        let options = SearchOptions::new().with_mode(DiscoveryMode::Enhanced);
        let result = discovery.discover(&zone(), &options).await.unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("enrichment service unavailable")));
    }

    #[tokio::test]
    async fn test_marine_only_skips_land_heritage_sources() {
        let wikipedia = MockSource::new(Source::Wikipedia).with_candidate(
            RawCandidate::new("Chiesa di San Giorgio", Source::Wikipedia)
                .with_description("x".repeat(60))
                .with_approximate_coordinates(Coordinate::new(44.05, 9.05)),
        );
        let overpass = MockSource::new(Source::Overpass)
            .with_candidate(inside("Relitto del Mohawk Deer", Source::Overpass));
        let discovery = Discovery::builder(MemoryCache::new())
            .with_source(Arc::new(wikipedia.clone()))
            .with_source(Arc::new(overpass))
            .build();

        let options = SearchOptions::new().marine_only(true);
        let result = discovery.discover(&zone(), &options).await.unwrap();

        assert_eq!(wikipedia.fetch_call_count(), 0, "excluded source must not be queried");
        assert!(!result.has_source(Source::Wikipedia));
        assert_eq!(result.candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_source_warning_does_not_imply_failure() {
        let discovery = Discovery::builder(MemoryCache::new())
            .with_source(Arc::new(MockSource::new(Source::Wikidata)))
            .build();

        let result = discovery.discover(&zone(), &SearchOptions::new()).await.unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("contributed no candidates")));
        assert!(!result.warnings.iter().any(|w| w.contains("fail")));
    }

    #[tokio::test]
    async fn test_empty_sources_yield_empty_success() {
        let discovery = Discovery::builder(MemoryCache::new()).build();
        let result = discovery.discover(&zone(), &SearchOptions::new()).await.unwrap();
        assert!(result.candidates.is_empty());
        assert_eq!(result.stats.total_candidates, 0);
    }
}

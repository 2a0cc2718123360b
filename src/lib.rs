//! Zone-Scoped Point-of-Interest Discovery
//!
//! A pipeline library that discovers candidate points of interest for a
//! user-drawn geographic zone by querying several heterogeneous,
//! independently rate-limited external sources, restricting results to
//! the zone's exact polygon, merging near-duplicates, and handing a clean
//! candidate list to a human curation step.
//!
//! # Design Philosophy
//!
//! - One capability contract (`PoiSource`) over three structurally
//!   different fetch strategies
//! - Degrade to empty, never throw: a dark source costs candidates, not
//!   the run
//! - Precision over recall: exact polygon containment, active cache
//!   validity checks, editorial quality gates
//! - Shared rate-limiter state is the only cross-run coupling
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use discovery::{Discovery, MemoryCache, SearchOptions, SourceRateLimiter, ZoneDescriptor};
//! use discovery::sources::{OverpassSource, WikidataSource, WikipediaSource};
//!
//! let limiter = Arc::new(SourceRateLimiter::new());
//! let discovery = Discovery::builder(MemoryCache::new())
//!     .with_source(Arc::new(WikipediaSource::new(Arc::clone(&limiter))))
//!     .with_source(Arc::new(WikidataSource::new(Arc::clone(&limiter))))
//!     .with_source(Arc::new(OverpassSource::new(limiter)))
//!     .build();
//!
//! let result = discovery.discover(&zone, &SearchOptions::new()).await?;
//! for poi in &result.candidates {
//!     println!("{} ({}, {}) via {}", poi.name, poi.lat, poi.lng, poi.source);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (PoiSource, ResultCache, CacheValidity)
//! - [`types`] - Zone, candidate, config, and result types
//! - [`pipeline`] - The Discovery orchestrator
//! - [`sources`] - Source adapters (Wikipedia, Wikidata, Overpass, Mock)
//! - [`cache`] - Content-addressed result caching with validity gates
//! - [`geo`] - Polygon containment and great-circle distance
//! - [`text`] - Name/description normalization and similarity

pub mod cache;
pub mod dedup;
pub mod error;
pub mod filter;
pub mod geo;
pub mod health;
pub mod limiter;
pub mod pipeline;
pub mod sources;
pub mod text;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{DiscoveryError, Result, SourceError, SourceResult};
pub use traits::{
    cache::{CacheValidity, ResultCache},
    source::PoiSource,
};
pub use types::{
    candidate::{Category, PoiCandidate, RawCandidate, Source},
    config::{DiscoveryConfig, DiscoveryMode, FilterConfig, SearchOptions},
    result::{DiscoveryResult, DiscoveryStats},
    zone::{BoundingBox, Coordinate, ZoneDescriptor},
};

// Re-export the orchestrator and its builder
pub use pipeline::{Discovery, DiscoveryBuilder};

// Re-export pipeline components
pub use cache::{cache_key, CacheEntry, CachedResults, DefaultValidity, MemoryCache};
pub use dedup::Deduplicator;
pub use filter::QualityFilter;
pub use health::HealthProbe;
pub use limiter::{SharedRateLimiter, SourceRateLimiter};

// Re-export source adapters
pub use sources::{MockSource, OverpassSource, WikidataSource, WikipediaSource};

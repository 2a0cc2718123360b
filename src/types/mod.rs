//! Data types for the discovery pipeline.

pub mod candidate;
pub mod config;
pub mod result;
pub mod zone;

pub use candidate::{Category, PoiCandidate, RawCandidate, Source};
pub use config::{DiscoveryConfig, DiscoveryMode, FilterConfig, SearchOptions};
pub use result::{DiscoveryResult, DiscoveryStats};
pub use zone::{BoundingBox, Coordinate, ZoneDescriptor};

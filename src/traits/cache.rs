//! Cache traits: a plain byte store plus the injectable validity gate.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{config::SearchOptions, result::DiscoveryResult};

/// A keyed byte store for completed pipeline results.
///
/// Deliberately knows nothing about payloads or validity; the age and
/// content checks live in [`CachedResults`](crate::cache::CachedResults).
/// Last-writer-wins semantics are acceptable for concurrent puts.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Load the raw bytes for a key, if present.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store bytes under a key, overwriting any existing entry.
    async fn put(&self, key: &str, payload: &[u8]) -> Result<()>;

    /// Remove an entry. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Content-aware validity predicate applied on every cache read.
///
/// These checks embed quality gates that belong to the pipeline, not the
/// cache: upstream filtering rules change between deployments, and a
/// previously cached low-quality payload must not be served indefinitely
/// just because it is fresh. Injectable so the byte store stays generic.
pub trait CacheValidity: Send + Sync {
    /// Whether a cached payload may be served for this request.
    fn is_valid(&self, payload: &DiscoveryResult, options: &SearchOptions) -> bool;
}

impl<F> CacheValidity for F
where
    F: Fn(&DiscoveryResult, &SearchOptions) -> bool + Send + Sync,
{
    fn is_valid(&self, payload: &DiscoveryResult, options: &SearchOptions) -> bool {
        self(payload, options)
    }
}

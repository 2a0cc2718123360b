//! Content-addressed caching of completed pipeline results.
//!
//! The byte store ([`ResultCache`]) stays generic; this module owns the
//! envelope format, the deterministic request key, and the active validity
//! gate applied on every read.

pub mod memory;

pub use memory::MemoryCache;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::Result;
use crate::traits::cache::{CacheValidity, ResultCache};
use crate::types::{
    candidate::Source,
    config::SearchOptions,
    result::DiscoveryResult,
    zone::ZoneDescriptor,
};

/// A stored pipeline result with its creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The serialized pipeline result.
    pub payload: DiscoveryResult,

    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

/// Deterministic cache key for a request.
///
/// Sha256 over the normalized request parameters: zone name, polygon at
/// fixed precision, seaward flag, marine flag, and mode. Fixed-precision
/// coordinate formatting keeps float noise from splitting entries.
pub fn cache_key(zone: &ZoneDescriptor, options: &SearchOptions) -> String {
    let mut hasher = Sha256::new();
    hasher.update(zone.name.trim().to_lowercase().as_bytes());
    for p in &zone.polygon {
        hasher.update(format!("{:.6},{:.6};", p.lat, p.lng).as_bytes());
    }
    hasher.update([options.extend_to_sea as u8, options.marine_only as u8]);
    hasher.update(options.mode.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Default validity gate.
///
/// Encodes the business rules the pipeline requires of a cached payload
/// beyond freshness: a marine-only request must not be answered with an
/// empty payload, nor with one carrying provenance from land-heritage
/// sources.
#[derive(Debug, Clone)]
pub struct DefaultValidity {
    /// Sources whose presence invalidates a payload under marine-only mode.
    pub invalid_marine_sources: Vec<Source>,
}

impl Default for DefaultValidity {
    fn default() -> Self {
        Self {
            invalid_marine_sources: vec![Source::Wikipedia],
        }
    }
}

impl CacheValidity for DefaultValidity {
    fn is_valid(&self, payload: &DiscoveryResult, options: &SearchOptions) -> bool {
        if options.marine_only {
            if payload.candidates.is_empty() {
                return false;
            }
            if self
                .invalid_marine_sources
                .iter()
                .any(|s| payload.has_source(*s))
            {
                return false;
            }
        }
        true
    }
}

/// Cache facade combining a byte store, a max age, and a validity gate.
///
/// A failing entry is deleted, not just skipped, so it is never returned
/// twice: corruption, staleness, and validity rejection all end in
/// deletion plus a miss.
pub struct CachedResults<C: ResultCache, V: CacheValidity> {
    store: C,
    validity: V,
    max_age: Duration,
}

impl<C: ResultCache, V: CacheValidity> CachedResults<C, V> {
    /// Create a cache facade.
    pub fn new(store: C, validity: V, max_age_secs: i64) -> Self {
        Self {
            store,
            validity,
            max_age: Duration::seconds(max_age_secs),
        }
    }

    /// Look up a usable cached result for the request.
    ///
    /// Misses on: absent key, unparsable entry, expired entry, or a
    /// validity-gate rejection. Every miss with a stored entry deletes it.
    pub async fn lookup(
        &self,
        zone: &ZoneDescriptor,
        options: &SearchOptions,
    ) -> Result<Option<DiscoveryResult>> {
        let key = cache_key(zone, options);
        let Some(bytes) = self.store.get(&key).await? else {
            return Ok(None);
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key = %key, error = %e, "dropping unparsable cache entry");
                self.store.delete(&key).await?;
                return Ok(None);
            }
        };

        if Utc::now() - entry.created_at > self.max_age {
            debug!(key = %key, "dropping expired cache entry");
            self.store.delete(&key).await?;
            return Ok(None);
        }

        if !self.validity.is_valid(&entry.payload, options) {
            info!(key = %key, zone = %zone.name, "dropping cache entry failing validity gate");
            self.store.delete(&key).await?;
            return Ok(None);
        }

        Ok(Some(entry.payload))
    }

    /// Store a completed result for the request.
    pub async fn store(
        &self,
        zone: &ZoneDescriptor,
        options: &SearchOptions,
        payload: &DiscoveryResult,
    ) -> Result<()> {
        let key = cache_key(zone, options);
        let entry = CacheEntry {
            payload: payload.clone(),
            created_at: Utc::now(),
        };
        let bytes = serde_json::to_vec(&entry)?;
        self.store.put(&key, &bytes).await
    }

    /// Access the underlying byte store.
    pub fn store_ref(&self) -> &C {
        &self.store
    }
}

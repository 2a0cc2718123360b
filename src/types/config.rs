//! Run options and pipeline configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::candidate::{Category, Source};

/// Discovery mode requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMode {
    /// The three built-in sources only.
    #[default]
    Standard,
    /// Additionally consult the remote enrichment service, when available.
    Enhanced,
}

impl DiscoveryMode {
    /// Stable identifier used in the cache key.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryMode::Standard => "standard",
            DiscoveryMode::Enhanced => "enhanced",
        }
    }
}

/// Per-run options supplied alongside the zone descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Extend the search area seaward of the zone polygon.
    #[serde(default)]
    pub extend_to_sea: bool,

    /// Restrict results to maritime/diving-related POIs, excluding
    /// land-heritage sources.
    #[serde(default)]
    pub marine_only: bool,

    /// Requested discovery mode.
    #[serde(default)]
    pub mode: DiscoveryMode,
}

impl SearchOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set marine-only mode.
    pub fn marine_only(mut self, marine_only: bool) -> Self {
        self.marine_only = marine_only;
        self
    }

    /// Set seaward extension.
    pub fn extend_to_sea(mut self, extend: bool) -> Self {
        self.extend_to_sea = extend;
        self
    }

    /// Set the discovery mode.
    pub fn with_mode(mut self, mode: DiscoveryMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Quality-filter configuration.
///
/// The generic-term denylist and the tourist-relevant category set are
/// editorial lists, injectable rather than hard-coded so deployments can
/// tune them without a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Generic terms that disqualify a name (case-insensitive substring
    /// match).
    pub generic_terms: Vec<String>,

    /// Categories considered tourist-relevant.
    pub tourist_categories: HashSet<Category>,

    /// Minimum description length that lets an uncategorized candidate
    /// through.
    pub min_uncategorized_description: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            generic_terms: [
                "water", "street", "road", "parking", "toilet", "bench",
                "entrance", "exit", "area", "zone", "point", "info",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            tourist_categories: [
                Category::Monument,
                Category::Castle,
                Category::Religious,
                Category::Museum,
                Category::Archaeological,
                Category::Viewpoint,
                Category::Attraction,
                Category::Historic,
                Category::Natural,
            ]
            .into_iter()
            .collect(),
            min_uncategorized_description: 50,
        }
    }
}

impl FilterConfig {
    /// Create the default editorial configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the generic-term denylist.
    pub fn with_generic_terms(
        mut self,
        terms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.generic_terms = terms.into_iter().map(|t| t.into()).collect();
        self
    }

    /// Replace the tourist-relevant category set.
    pub fn with_tourist_categories(
        mut self,
        categories: impl IntoIterator<Item = Category>,
    ) -> Self {
        self.tourist_categories = categories.into_iter().collect();
        self
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Quality-filter settings.
    pub filter: FilterConfig,

    /// Deduplication distance threshold in meters.
    pub dedup_threshold_m: f64,

    /// Maximum cache entry age in seconds.
    pub cache_max_age_secs: i64,

    /// Sources skipped entirely during marine-only runs.
    ///
    /// Must agree with the cache validity gate's invalid set, so a fresh
    /// marine-only payload is servable from the cache afterwards.
    pub marine_excluded_sources: Vec<Source>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            dedup_threshold_m: 200.0,
            cache_max_age_secs: 24 * 3600,
            marine_excluded_sources: vec![Source::Wikipedia],
        }
    }
}

impl DiscoveryConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter configuration.
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Set the deduplication threshold in meters.
    pub fn with_dedup_threshold_m(mut self, meters: f64) -> Self {
        self.dedup_threshold_m = meters;
        self
    }

    /// Set the cache max age in seconds.
    pub fn with_cache_max_age_secs(mut self, secs: i64) -> Self {
        self.cache_max_age_secs = secs;
        self
    }

    /// Replace the set of sources skipped during marine-only runs.
    pub fn with_marine_excluded_sources(
        mut self,
        sources: impl IntoIterator<Item = Source>,
    ) -> Self {
        self.marine_excluded_sources = sources.into_iter().collect();
        self
    }
}

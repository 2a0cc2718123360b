//! Discovery run output: candidates plus summary statistics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::candidate::{PoiCandidate, Source};

/// Summary statistics for a discovery run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryStats {
    /// Number of candidates in the final output.
    pub total_candidates: usize,

    /// Final candidate counts per source.
    pub per_source: HashMap<String, usize>,

    /// Raw candidates rejected by the quality filter.
    pub discarded_by_filter: usize,

    /// Candidates rejected by the zone-boundary filter.
    pub discarded_by_boundary: usize,

    /// Candidates merged away as near-duplicates.
    pub merged_duplicates: usize,
}

impl DiscoveryStats {
    /// Recompute the totals from a candidate list.
    pub fn tally(&mut self, candidates: &[PoiCandidate]) {
        self.total_candidates = candidates.len();
        self.per_source.clear();
        for c in candidates {
            *self
                .per_source
                .entry(c.source.as_str().to_string())
                .or_insert(0) += 1;
        }
    }

    /// Final count for one source.
    pub fn source_count(&self, source: Source) -> usize {
        self.per_source.get(source.as_str()).copied().unwrap_or(0)
    }
}

/// The result of a discovery run.
///
/// Always produced, possibly empty: non-fatal failures are reported as
/// warnings rather than errors so downstream consumers never need failure
/// handling branches for this call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryResult {
    /// Ordered candidate list.
    pub candidates: Vec<PoiCandidate>,

    /// Summary statistics.
    pub stats: DiscoveryStats,

    /// Non-fatal diagnostics accumulated during the run.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl DiscoveryResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a result from a final candidate list.
    pub fn from_candidates(candidates: Vec<PoiCandidate>) -> Self {
        let mut stats = DiscoveryStats::default();
        stats.tally(&candidates);
        Self {
            candidates,
            stats,
            warnings: Vec::new(),
        }
    }

    /// Record a non-fatal warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Whether any candidate carries the given provenance tag.
    pub fn has_source(&self, source: Source) -> bool {
        self.candidates.iter().any(|c| c.source == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::candidate::Category;

    fn candidate(name: &str, source: Source) -> PoiCandidate {
        PoiCandidate {
            name: name.to_string(),
            description: String::new(),
            lat: 44.05,
            lng: 9.05,
            category: Category::Monument,
            source,
            zone_name: "Zone".to_string(),
            location_context: "Town".to_string(),
            approximate_location: false,
        }
    }

    #[test]
    fn test_stats_tally_per_source() {
        let result = DiscoveryResult::from_candidates(vec![
            candidate("A", Source::Wikipedia),
            candidate("B", Source::Wikidata),
            candidate("C", Source::Wikidata),
        ]);
        assert_eq!(result.stats.total_candidates, 3);
        assert_eq!(result.stats.source_count(Source::Wikidata), 2);
        assert_eq!(result.stats.source_count(Source::Overpass), 0);
    }

    #[test]
    fn test_has_source() {
        let result = DiscoveryResult::from_candidates(vec![candidate("A", Source::Wikipedia)]);
        assert!(result.has_source(Source::Wikipedia));
        assert!(!result.has_source(Source::Overpass));
    }
}

//! Deduplicator - merges candidates that describe the same real-world
//! place across sources.

use indexmap::IndexMap;
use tracing::debug;

use crate::geo::haversine_m;
use crate::text::clean_name;
use crate::types::candidate::RawCandidate;

/// Merges near-duplicate candidates in a single left-to-right pass.
///
/// Candidates are grouped by normalized-name key. A key collision within
/// the distance threshold is the same place: the entry with the longer
/// description wins, replacing the kept one in place. Beyond the threshold
/// the two are distinct places sharing a name and both are kept. Output
/// preserves first-seen order, so the pass is idempotent.
pub struct Deduplicator {
    /// Same-place distance threshold in meters.
    threshold_m: f64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(200.0)
    }
}

impl Deduplicator {
    /// Create a deduplicator with an explicit distance threshold.
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }

    /// Deduplicate, returning survivors and the merged-away count.
    pub fn apply(&self, candidates: Vec<RawCandidate>) -> (Vec<RawCandidate>, usize) {
        let mut kept: Vec<RawCandidate> = Vec::with_capacity(candidates.len());
        // Normalized name -> indices into `kept` sharing that name.
        let mut by_name: IndexMap<String, Vec<usize>> = IndexMap::new();
        let mut merged = 0usize;

        'next: for candidate in candidates {
            let key = clean_name(&candidate.name).to_lowercase();
            let indices = by_name.entry(key).or_default();

            for &idx in indices.iter() {
                if self.same_place(&kept[idx], &candidate) {
                    if candidate.description.chars().count()
                        > kept[idx].description.chars().count()
                    {
                        debug!(
                            name = %candidate.name,
                            winner = %candidate.source,
                            loser = %kept[idx].source,
                            "merged duplicate, keeping longer description"
                        );
                        kept[idx] = candidate;
                    } else {
                        debug!(name = %kept[idx].name, "merged duplicate, keeping existing");
                    }
                    merged += 1;
                    continue 'next;
                }
            }

            indices.push(kept.len());
            kept.push(candidate);
        }

        (kept, merged)
    }

    /// Whether two same-named candidates are the same physical place.
    fn same_place(&self, a: &RawCandidate, b: &RawCandidate) -> bool {
        match (a.coordinate(), b.coordinate()) {
            (Some(ca), Some(cb)) => haversine_m(ca, cb) <= self.threshold_m,
            // Without geometry on both sides, distance cannot separate
            // them; a shared name is treated as the same place.
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::candidate::Source;

    fn candidate(name: &str, lat: f64, lng: f64, description: &str) -> RawCandidate {
        RawCandidate::new(name, Source::Overpass)
            .with_coordinates(lat, lng)
            .with_description(description)
    }

    #[test]
    fn test_nearby_same_name_merged_keeping_longer_description() {
        let short = candidate("Castello", 44.0500, 9.0500, "short desc");
        // Roughly 50 m north.
        let long = candidate("Castello", 44.0504, 9.0500, &"x".repeat(200));

        let (kept, merged) = Deduplicator::new(200.0).apply(vec![short, long]);
        assert_eq!(kept.len(), 1);
        assert_eq!(merged, 1);
        assert_eq!(kept[0].description.len(), 200);
    }

    #[test]
    fn test_distant_same_name_both_kept() {
        let a = candidate("Castello", 44.05, 9.05, "one");
        // Several kilometers away.
        let b = candidate("Castello", 44.15, 9.05, "two");

        let (kept, merged) = Deduplicator::new(200.0).apply(vec![a, b]);
        assert_eq!(kept.len(), 2);
        assert_eq!(merged, 0);
    }

    #[test]
    fn test_name_normalization_collides_noisy_variants() {
        let a = candidate("1. Castello Brown", 44.05, 9.05, "from the wiki list");
        let b = candidate("Castello Brown (museo)", 44.0501, 9.05, "longer map description");

        let (kept, _) = Deduplicator::new(200.0).apply(vec![a, b]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_first_seen_order_preserved() {
        let (kept, _) = Deduplicator::new(200.0).apply(vec![
            candidate("Faro", 44.05, 9.05, ""),
            candidate("Castello", 44.06, 9.05, ""),
            candidate("Abbazia", 44.07, 9.05, ""),
        ]);
        let names: Vec<&str> = kept.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Faro", "Castello", "Abbazia"]);
    }

    #[test]
    fn test_idempotent() {
        let dedup = Deduplicator::new(200.0);
        let input = vec![
            candidate("Castello", 44.0500, 9.05, "a"),
            candidate("Castello", 44.0504, 9.05, "bb"),
            candidate("Faro", 44.06, 9.05, "c"),
        ];
        let (once, _) = dedup.apply(input);
        let (twice, merged_again) = dedup.apply(once.clone());
        assert_eq!(once, twice);
        assert_eq!(merged_again, 0);
    }
}

//! Quality filter - rejects structurally invalid or non-touristic
//! candidates before they reach the boundary filter.

use tracing::debug;

use crate::text::is_meaningful_name;
use crate::types::{
    candidate::{Category, RawCandidate},
    config::FilterConfig,
};

/// Heuristic quality gate over raw candidates.
///
/// A candidate passes iff its name is meaningful, both coordinates are
/// present and finite, and either its category hint maps into the
/// tourist-relevant set or it has no hint but a substantial description.
/// Rejections are logged with a reason and never raise errors.
pub struct QualityFilter {
    config: FilterConfig,
}

impl QualityFilter {
    /// Create a filter from editorial configuration.
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Whether a single candidate passes the gate.
    pub fn accepts(&self, candidate: &RawCandidate) -> bool {
        if !is_meaningful_name(&candidate.name, &self.config.generic_terms) {
            debug!(name = %candidate.name, source = %candidate.source, "rejected: generic or meaningless name");
            return false;
        }

        let coords_ok = matches!(
            (candidate.lat, candidate.lng),
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite()
        );
        if !coords_ok {
            debug!(name = %candidate.name, source = %candidate.source, "rejected: missing or non-finite coordinates");
            return false;
        }

        match &candidate.category_hint {
            Some(hint) => {
                let category = Category::from_hint(hint);
                if self.config.tourist_categories.contains(&category) {
                    true
                } else {
                    debug!(
                        name = %candidate.name,
                        hint = %hint,
                        "rejected: category outside tourist-relevant set"
                    );
                    false
                }
            }
            None => {
                if candidate.description.chars().count()
                    >= self.config.min_uncategorized_description
                {
                    true
                } else {
                    debug!(name = %candidate.name, "rejected: uncategorized with short description");
                    false
                }
            }
        }
    }

    /// Filter a batch, returning survivors in order plus the reject count.
    pub fn apply(&self, candidates: Vec<RawCandidate>) -> (Vec<RawCandidate>, usize) {
        let before = candidates.len();
        let kept: Vec<RawCandidate> = candidates
            .into_iter()
            .filter(|c| self.accepts(c))
            .collect();
        let rejected = before - kept.len();
        (kept, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::candidate::Source;

    fn filter() -> QualityFilter {
        QualityFilter::new(FilterConfig::default())
    }

    fn candidate(name: &str) -> RawCandidate {
        RawCandidate::new(name, Source::Overpass)
            .with_coordinates(44.05, 9.05)
            .with_category_hint("castle")
    }

    #[test]
    fn test_accepts_categorized_candidate() {
        assert!(filter().accepts(&candidate("Castello Brown")));
    }

    #[test]
    fn test_rejects_generic_denylisted_name() {
        assert!(!filter().accepts(&candidate("Water")));
    }

    #[test]
    fn test_rejects_missing_coordinates() {
        let c = RawCandidate::new("Castello Brown", Source::Wikidata).with_category_hint("castle");
        assert!(!filter().accepts(&c));
    }

    #[test]
    fn test_uncategorized_needs_long_description() {
        let short = RawCandidate::new("Castello Brown", Source::Wikipedia)
            .with_coordinates(44.05, 9.05)
            .with_description("Too short.");
        assert!(!filter().accepts(&short));

        let long = RawCandidate::new("Castello Brown", Source::Wikipedia)
            .with_coordinates(44.05, 9.05)
            .with_description("A 16th century fortress overlooking the harbour, later converted into a private residence.");
        assert!(filter().accepts(&long));
    }

    #[test]
    fn test_rejects_non_tourist_category() {
        let c = RawCandidate::new("Ufficio Postale", Source::Overpass)
            .with_coordinates(44.05, 9.05)
            .with_category_hint("office");
        assert!(!filter().accepts(&c));
    }

    #[test]
    fn test_apply_counts_rejections() {
        let (kept, rejected) = filter().apply(vec![
            candidate("Castello Brown"),
            candidate("Water"),
            candidate("Faro di Portofino"),
        ]);
        assert_eq!(kept.len(), 2);
        assert_eq!(rejected, 1);
    }
}

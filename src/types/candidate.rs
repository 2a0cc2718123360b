//! Candidate types - raw source output and the normalized POI shape.

use serde::{Deserialize, Serialize};

use crate::types::zone::Coordinate;

/// Provenance tag identifying which external source produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Encyclopedic text corpus (article section mining).
    Wikipedia,
    /// Structured knowledge-graph query service (SPARQL).
    Wikidata,
    /// Open map-feature service (tagged features).
    Overpass,
}

impl Source {
    /// Stable identifier used in logs and cache payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Wikipedia => "wikipedia",
            Source::Wikidata => "wikidata",
            Source::Overpass => "overpass",
        }
    }

    /// All sources in the pipeline's fixed fetch order.
    pub const ALL: [Source; 3] = [Source::Wikipedia, Source::Wikidata, Source::Overpass];
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed category vocabulary for emitted candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Monument,
    Castle,
    Religious,
    Museum,
    Archaeological,
    Viewpoint,
    Attraction,
    Historic,
    Natural,
    Other,
}

impl Category {
    /// Map a free-text category hint onto the closed vocabulary.
    ///
    /// Unrecognized hints fall through to `Other`.
    pub fn from_hint(hint: &str) -> Self {
        let hint = hint.to_lowercase();
        if hint.contains("castle") || hint.contains("fort") {
            Category::Castle
        } else if hint.contains("church")
            || hint.contains("religious")
            || hint.contains("monastery")
            || hint.contains("sanctuary")
            || hint.contains("place_of_worship")
            || hint.contains("abbey")
        {
            Category::Religious
        } else if hint.contains("museum") {
            Category::Museum
        } else if hint.contains("archaeolog") || hint.contains("ruins") {
            Category::Archaeological
        } else if hint.contains("viewpoint") || hint.contains("panorama") {
            Category::Viewpoint
        } else if hint.contains("monument") || hint.contains("memorial") {
            Category::Monument
        } else if hint.contains("historic") || hint.contains("heritage") {
            Category::Historic
        } else if hint.contains("natural")
            || hint.contains("beach")
            || hint.contains("cave")
            || hint.contains("park")
        {
            Category::Natural
        } else if hint.contains("attraction") || hint.contains("tourism") {
            Category::Attraction
        } else {
            Category::Other
        }
    }
}

/// A source's native output before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Name as extracted, possibly noisy.
    pub name: String,

    /// Description as extracted, possibly empty.
    pub description: String,

    /// Latitude, if the source provided one.
    pub lat: Option<f64>,

    /// Longitude, if the source provided one.
    pub lng: Option<f64>,

    /// Which source produced this candidate.
    pub source: Source,

    /// Free-text category hint from the source, if any.
    pub category_hint: Option<String>,

    /// True when coordinates were inherited from the containing area
    /// rather than observed for the item itself.
    pub approximate_location: bool,
}

impl RawCandidate {
    /// Create a raw candidate with observed coordinates.
    pub fn new(name: impl Into<String>, source: Source) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            lat: None,
            lng: None,
            source,
            category_hint: None,
            approximate_location: false,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set observed coordinates.
    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    /// Set coordinates inherited from the containing area.
    pub fn with_approximate_coordinates(mut self, center: Coordinate) -> Self {
        self.lat = Some(center.lat);
        self.lng = Some(center.lng);
        self.approximate_location = true;
        self
    }

    /// Set the category hint.
    pub fn with_category_hint(mut self, hint: impl Into<String>) -> Self {
        self.category_hint = Some(hint.into());
        self
    }

    /// The candidate's coordinate, when both components are present.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

/// A normalized point-of-interest candidate, the pipeline's output unit.
///
/// Never mutated after emission; downstream curation owns any further
/// lifecycle. Every candidate lies inside the zone polygon or carries
/// `approximate_location = true` (text-corpus extractions with no per-item
/// geometry inherit the zone center).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiCandidate {
    /// Cleaned name, at most 200 characters.
    pub name: String,

    /// Cleaned description, at most 1000 characters.
    pub description: String,

    /// Latitude, finite and within world bounds.
    pub lat: f64,

    /// Longitude, finite and within world bounds.
    pub lng: f64,

    /// Category from the closed vocabulary.
    pub category: Category,

    /// Provenance tag.
    pub source: Source,

    /// Name of the zone this candidate was discovered for.
    pub zone_name: String,

    /// Nearest municipality or area label.
    pub location_context: String,

    /// Propagated from the raw candidate.
    pub approximate_location: bool,
}

impl PoiCandidate {
    /// The candidate's coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

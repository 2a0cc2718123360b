//! Zone descriptor types - the geographic input to a discovery run.

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// A geographic coordinate in WGS84.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and within world bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// An axis-aligned geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Northern latitude boundary.
    pub north: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Western longitude boundary.
    pub west: f64,
}

impl BoundingBox {
    /// Create a new bounding box from the given boundaries.
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Derive the axis-aligned extent of a polygon.
    ///
    /// Returns `None` for an empty polygon.
    pub fn from_polygon(polygon: &[Coordinate]) -> Option<Self> {
        let first = polygon.first()?;
        let mut bbox = Self::new(first.lat, first.lat, first.lng, first.lng);
        for p in &polygon[1..] {
            bbox.north = bbox.north.max(p.lat);
            bbox.south = bbox.south.min(p.lat);
            bbox.east = bbox.east.max(p.lng);
            bbox.west = bbox.west.min(p.lng);
        }
        Some(bbox)
    }

    /// Whether a coordinate falls within this box (inclusive).
    pub fn contains(&self, point: Coordinate) -> bool {
        point.lat <= self.north
            && point.lat >= self.south
            && point.lng <= self.east
            && point.lng >= self.west
    }
}

/// A user-drawn geographic zone of interest.
///
/// Immutable input to the pipeline. The polygon is an ordered sequence of
/// at least 3 vertices, closed implicitly (the last vertex connects back
/// to the first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDescriptor {
    /// Display name of the zone (also the primary place-name lookup key).
    pub name: String,

    /// Ordered polygon vertices, closed implicitly.
    pub polygon: Vec<Coordinate>,

    /// Explicit bounding box, if the caller has one.
    ///
    /// When absent it is derived as the polygon's axis-aligned extent.
    pub bounding_box: Option<BoundingBox>,

    /// Optional precomputed center, used in place of the vertex mean.
    pub center_hint: Option<Coordinate>,

    /// Nearest municipality or area label.
    ///
    /// Used for document resolution in the text-corpus source and as the
    /// emitted candidates' location context.
    pub location_hint: Option<String>,
}

impl ZoneDescriptor {
    /// Create a new zone descriptor from a name and polygon.
    pub fn new(name: impl Into<String>, polygon: Vec<Coordinate>) -> Self {
        Self {
            name: name.into(),
            polygon,
            bounding_box: None,
            center_hint: None,
            location_hint: None,
        }
    }

    /// Set an explicit bounding box.
    pub fn with_bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = Some(bbox);
        self
    }

    /// Set a center hint.
    pub fn with_center_hint(mut self, center: Coordinate) -> Self {
        self.center_hint = Some(center);
        self
    }

    /// Set the municipality/location hint.
    pub fn with_location_hint(mut self, hint: impl Into<String>) -> Self {
        self.location_hint = Some(hint.into());
        self
    }

    /// The area label for emitted candidates: the hint if set, else the
    /// zone name.
    pub fn location_context(&self) -> &str {
        self.location_hint.as_deref().unwrap_or(&self.name)
    }

    /// Validate the descriptor before any network activity.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DiscoveryError::InvalidZone {
                reason: "zone name is empty".to_string(),
            });
        }
        if self.polygon.len() < 3 {
            return Err(DiscoveryError::InvalidZone {
                reason: format!("polygon has {} points, need at least 3", self.polygon.len()),
            });
        }
        if let Some(p) = self.polygon.iter().find(|p| !p.is_valid()) {
            return Err(DiscoveryError::InvalidZone {
                reason: format!("polygon vertex out of bounds: ({}, {})", p.lat, p.lng),
            });
        }
        Ok(())
    }

    /// The effective bounding box: explicit if set, else derived.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
            .or_else(|| BoundingBox::from_polygon(&self.polygon))
    }

    /// The zone center: the hint if set, else the polygon vertex mean.
    pub fn center(&self) -> Coordinate {
        if let Some(hint) = self.center_hint {
            return hint;
        }
        crate::geo::centroid(&self.polygon).unwrap_or(Coordinate::new(0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coordinate> {
        vec![
            Coordinate::new(44.0, 9.0),
            Coordinate::new(44.0, 9.1),
            Coordinate::new(44.1, 9.1),
            Coordinate::new(44.1, 9.0),
        ]
    }

    #[test]
    fn test_validate_accepts_square() {
        let zone = ZoneDescriptor::new("Portofino", square());
        assert!(zone.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let zone = ZoneDescriptor::new("  ", square());
        assert!(zone.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_degenerate_polygon() {
        let zone = ZoneDescriptor::new(
            "Line",
            vec![Coordinate::new(44.0, 9.0), Coordinate::new(44.1, 9.1)],
        );
        assert!(zone.validate().is_err());
    }

    #[test]
    fn test_bounding_box_derived_from_polygon() {
        let zone = ZoneDescriptor::new("Portofino", square());
        let bbox = zone.bounding_box().unwrap();
        assert_eq!(bbox.north, 44.1);
        assert_eq!(bbox.south, 44.0);
        assert_eq!(bbox.east, 9.1);
        assert_eq!(bbox.west, 9.0);
    }

    #[test]
    fn test_center_prefers_hint() {
        let zone = ZoneDescriptor::new("Portofino", square())
            .with_center_hint(Coordinate::new(44.05, 9.05));
        let c = zone.center();
        assert_eq!(c.lat, 44.05);
        assert_eq!(c.lng, 9.05);
    }

    #[test]
    fn test_bbox_contains() {
        let bbox = BoundingBox::from_polygon(&square()).unwrap();
        assert!(bbox.contains(Coordinate::new(44.05, 9.05)));
        assert!(!bbox.contains(Coordinate::new(45.0, 9.05)));
    }
}

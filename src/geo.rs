//! Geometric primitives: polygon containment, great-circle distance,
//! centroid.
//!
//! All functions are pure and deterministic; callers normalize vertex
//! representations to [`Coordinate`] before invoking.

use crate::types::zone::Coordinate;

/// Mean Earth radius in meters, used by the haversine formula.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Ray-casting point-in-polygon test.
///
/// Casts a ray westward from the point and toggles an inside flag at each
/// edge crossing. Independent of vertex winding order. A polygon with
/// fewer than 3 vertices contains nothing.
pub fn contains(point: Coordinate, polygon: &[Coordinate]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (vi, vj) = (polygon[i], polygon[j]);
        // Crossing: point latitude strictly between edge latitudes, and the
        // point lies left of the edge at that latitude.
        if (vi.lat > point.lat) != (vj.lat > point.lat) {
            let edge_lng_at_lat =
                (vj.lng - vi.lng) * (point.lat - vi.lat) / (vj.lat - vi.lat) + vi.lng;
            if point.lng < edge_lng_at_lat {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Great-circle distance in meters between two coordinates (haversine).
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Arithmetic mean of the polygon vertices.
///
/// Not the area centroid, but adequate as a zone center for radius-scoped
/// queries. Returns `None` for an empty polygon.
pub fn centroid(polygon: &[Coordinate]) -> Option<Coordinate> {
    if polygon.is_empty() {
        return None;
    }
    let n = polygon.len() as f64;
    let lat = polygon.iter().map(|p| p.lat).sum::<f64>() / n;
    let lng = polygon.iter().map(|p| p.lng).sum::<f64>() / n;
    Some(Coordinate::new(lat, lng))
}

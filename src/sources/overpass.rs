//! Map-feature adapter: queries tagged tourism/historic features within
//! the zone's bounding box.
//!
//! The bounding box is a coarse scope; every returned feature still goes
//! through the exact polygon containment test before acceptance.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::error::{SourceError, SourceResult};
use crate::geo::contains;
use crate::limiter::SharedRateLimiter;
use crate::sources::{http_client, parse_endpoint, send_with_retry};
use crate::traits::source::PoiSource;
use crate::types::{
    candidate::{RawCandidate, Source},
    zone::{BoundingBox, Coordinate, ZoneDescriptor},
};

/// Default Overpass API endpoint.
const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Tourism tag values worth fetching.
const TOURISM_VALUES: &str = "museum|attraction|viewpoint|artwork";

/// Half side, in degrees, of the fallback box around the centroid when the
/// zone has no bounding box of its own.
const FALLBACK_HALF_SIDE_DEG: f64 = 0.05;

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    /// Node coordinates, or the precomputed center for ways.
    fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => self.center.as_ref().map(|c| Coordinate::new(c.lat, c.lon)),
        }
    }

    /// Map feature tags to a category hint with a fixed priority:
    /// historic > tourism > place-of-worship amenity > other.
    fn category_hint(&self) -> Option<String> {
        if let Some(historic) = self.tags.get("historic") {
            return Some(format!("historic:{}", historic));
        }
        if let Some(tourism) = self.tags.get("tourism") {
            return Some(format!("tourism:{}", tourism));
        }
        if self.tags.get("amenity").map(String::as_str) == Some("place_of_worship") {
            return Some("place_of_worship".to_string());
        }
        None
    }
}

/// Map-feature source adapter.
pub struct OverpassSource {
    client: reqwest::Client,
    limiter: SharedRateLimiter,
    endpoint: String,
}

impl OverpassSource {
    /// Create an adapter sharing the given rate limiter.
    pub fn new(limiter: SharedRateLimiter) -> Self {
        Self {
            client: http_client(),
            limiter,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Point at a different Overpass endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The query scope: the zone's bounding box, or a fixed-size box
    /// around its centroid.
    fn query_bbox(zone: &ZoneDescriptor) -> BoundingBox {
        zone.bounding_box().unwrap_or_else(|| {
            let center = zone.center();
            BoundingBox::new(
                center.lat + FALLBACK_HALF_SIDE_DEG,
                center.lat - FALLBACK_HALF_SIDE_DEG,
                center.lng + FALLBACK_HALF_SIDE_DEG,
                center.lng - FALLBACK_HALF_SIDE_DEG,
            )
        })
    }

    /// Build the Overpass QL query over the fixed tag set.
    fn build_query(bbox: BoundingBox) -> String {
        let b = format!(
            "{},{},{},{}",
            bbox.south, bbox.west, bbox.north, bbox.east
        );
        format!(
            r#"[out:json][timeout:25];
(
  node["historic"]({b});
  way["historic"]({b});
  node["tourism"~"^({t})$"]({b});
  way["tourism"~"^({t})$"]({b});
  node["amenity"="place_of_worship"]({b});
  way["amenity"="place_of_worship"]({b});
);
out center tags;"#,
            b = b,
            t = TOURISM_VALUES,
        )
    }

    async fn run_query(&self, zone: &ZoneDescriptor) -> SourceResult<Vec<RawCandidate>> {
        let endpoint = parse_endpoint(&self.endpoint)?;
        let query = Self::build_query(Self::query_bbox(zone));

        let response = send_with_retry(&self.limiter, Source::Overpass, || {
            self.client
                .post(endpoint.clone())
                .form(&[("data", query.as_str())])
        })
        .await?;

        let parsed: OverpassResponse =
            response
                .json()
                .await
                .map_err(|e| SourceError::MalformedResponse {
                    endpoint: self.endpoint.clone(),
                    reason: e.to_string(),
                })?;

        let mut candidates = Vec::new();
        for element in parsed.elements {
            let Some(name) = element.tags.get("name").cloned() else {
                continue;
            };
            let Some(point) = element.coordinate() else {
                continue;
            };
            // The bounding box was only the coarse scope.
            if !contains(point, &zone.polygon) {
                continue;
            }

            let mut candidate =
                RawCandidate::new(name, Source::Overpass).with_coordinates(point.lat, point.lng);
            if let Some(hint) = element.category_hint() {
                candidate = candidate.with_category_hint(hint);
            }
            if let Some(description) = element.tags.get("description") {
                candidate = candidate.with_description(description.clone());
            }
            candidates.push(candidate);
        }
        Ok(candidates)
    }
}

#[async_trait]
impl PoiSource for OverpassSource {
    fn source(&self) -> Source {
        Source::Overpass
    }

    async fn fetch(&self, zone: &ZoneDescriptor) -> Vec<RawCandidate> {
        match self.run_query(zone).await {
            Ok(candidates) => {
                info!(zone = %zone.name, count = candidates.len(), "map features in polygon");
                candidates
            }
            Err(e) => {
                warn!(zone = %zone.name, error = %e, "map feature fetch failed, yielding nothing");
                Vec::new()
            }
        }
    }
}

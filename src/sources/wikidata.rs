//! Knowledge-graph adapter: one SPARQL radius query around the zone
//! centroid, constrained to a curated set of heritage entity types.
//!
//! The radius is a coarse pre-filter only; every parsed result still goes
//! through the exact polygon containment test.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{SourceError, SourceResult};
use crate::geo::contains;
use crate::limiter::SharedRateLimiter;
use crate::sources::{http_client, parse_endpoint, send_with_retry};
use crate::traits::source::PoiSource;
use crate::types::{
    candidate::{RawCandidate, Source},
    zone::{Coordinate, ZoneDescriptor},
};

/// Default SPARQL endpoint.
const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Curated heritage entity classes: monument, castle, religious building,
/// museum, archaeological site.
const ENTITY_CLASSES: &[&str] = &["Q4989906", "Q23413", "Q24398318", "Q33506", "Q839954"];

/// Default pre-filter radius in kilometers.
const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<SparqlBinding>,
}

#[derive(Debug, Deserialize)]
struct SparqlBinding {
    #[serde(rename = "itemLabel")]
    item_label: Option<SparqlValue>,
    coord: Option<SparqlValue>,
    #[serde(rename = "classLabel")]
    class_label: Option<SparqlValue>,
    description: Option<SparqlValue>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: String,
}

/// Knowledge-graph source adapter.
pub struct WikidataSource {
    client: reqwest::Client,
    limiter: SharedRateLimiter,
    endpoint: String,
    radius_km: f64,
}

impl WikidataSource {
    /// Create an adapter sharing the given rate limiter.
    pub fn new(limiter: SharedRateLimiter) -> Self {
        Self {
            client: http_client(),
            limiter,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            radius_km: DEFAULT_RADIUS_KM,
        }
    }

    /// Point at a different SPARQL endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the pre-filter radius in kilometers.
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Build the geographic query for a zone center.
    fn build_query(&self, center: Coordinate) -> String {
        let classes = ENTITY_CLASSES
            .iter()
            .map(|c| format!("wd:{}", c))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            r#"SELECT ?item ?itemLabel ?coord ?classLabel ?description WHERE {{
  SERVICE wikibase:around {{
    ?item wdt:P625 ?coord .
    bd:serviceParam wikibase:center "Point({lng} {lat})"^^geo:wktLiteral .
    bd:serviceParam wikibase:radius "{radius}" .
  }}
  VALUES ?class {{ {classes} }}
  ?item wdt:P31/wdt:P279* ?class .
  OPTIONAL {{ ?item schema:description ?description . FILTER(LANG(?description) = "en") }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en" . }}
}}
LIMIT 200"#,
            lng = center.lng,
            lat = center.lat,
            radius = self.radius_km,
            classes = classes,
        )
    }

    async fn run_query(&self, zone: &ZoneDescriptor) -> SourceResult<Vec<RawCandidate>> {
        let endpoint = parse_endpoint(&self.endpoint)?;
        let query = self.build_query(zone.center());

        let response = send_with_retry(&self.limiter, Source::Wikidata, || {
            self.client
                .get(endpoint.clone())
                .query(&[("query", query.as_str()), ("format", "json")])
        })
        .await?;

        let parsed: SparqlResponse =
            response
                .json()
                .await
                .map_err(|e| SourceError::MalformedResponse {
                    endpoint: self.endpoint.clone(),
                    reason: e.to_string(),
                })?;

        let mut candidates = Vec::new();
        for binding in parsed.results.bindings {
            let Some(label) = binding.item_label else {
                continue;
            };
            // Results without parseable coordinates are dropped outright.
            let Some(point) = binding.coord.as_ref().and_then(|c| parse_point(&c.value)) else {
                debug!(item = %label.value, "dropping result without parseable point");
                continue;
            };
            // Radius was only the coarse pre-filter.
            if !contains(point, &zone.polygon) {
                continue;
            }

            let mut candidate = RawCandidate::new(label.value, Source::Wikidata)
                .with_coordinates(point.lat, point.lng);
            if let Some(class) = binding.class_label {
                candidate = candidate.with_category_hint(class.value);
            }
            if let Some(description) = binding.description {
                candidate = candidate.with_description(description.value);
            }
            candidates.push(candidate);
        }
        Ok(candidates)
    }
}

#[async_trait]
impl PoiSource for WikidataSource {
    fn source(&self) -> Source {
        Source::Wikidata
    }

    async fn fetch(&self, zone: &ZoneDescriptor) -> Vec<RawCandidate> {
        match self.run_query(zone).await {
            Ok(candidates) => {
                info!(zone = %zone.name, count = candidates.len(), "knowledge graph candidates in polygon");
                candidates
            }
            Err(e) => {
                warn!(zone = %zone.name, error = %e, "knowledge graph fetch failed, yielding nothing");
                Vec::new()
            }
        }
    }
}

/// Parse a `"Point(lng lat)"`-style WKT literal.
fn parse_point(literal: &str) -> Option<Coordinate> {
    let inner = literal
        .trim()
        .strip_prefix("Point(")
        .and_then(|s| s.strip_suffix(')'))?;
    let mut parts = inner.split_whitespace();
    let lng: f64 = parts.next()?.parse().ok()?;
    let lat: f64 = parts.next()?.parse().ok()?;
    let point = Coordinate::new(lat, lng);
    point.is_valid().then_some(point)
}

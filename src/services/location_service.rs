use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::Coordinate;

/// Result of a single upstream geocoding attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(Coordinate),
    NotFound,
    /// The service could not answer right now (network, 5xx, rate limited).
    Unavailable(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> GeocodeOutcome;
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Free-text search against a Nominatim instance.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> GeocodeOutcome {
        let url = format!("{}/search", self.base_url);

        let resp = match self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("📍 Geocoder unreachable: {}", e);
                return GeocodeOutcome::Unavailable(e.to_string());
            }
        };

        if !resp.status().is_success() {
            warn!("📍 Geocoder non-OK for '{}': {}", query, resp.status());
            return GeocodeOutcome::Unavailable(format!("status {}", resp.status()));
        }

        let hits: Vec<NominatimHit> = match resp.json().await {
            Ok(data) => data,
            Err(e) => {
                warn!("📍 Geocoder JSON parse failed: {}", e);
                return GeocodeOutcome::Unavailable(e.to_string());
            }
        };

        hits.first()
            .and_then(parse_hit)
            .map(GeocodeOutcome::Found)
            .unwrap_or(GeocodeOutcome::NotFound)
    }
}

fn parse_hit(hit: &NominatimHit) -> Option<Coordinate> {
    let lat = hit.lat.trim().parse::<f64>().ok()?;
    let lon = hit.lon.trim().parse::<f64>().ok()?;
    debug!("📍 Matched '{}' at ({}, {})", hit.display_name, lat, lon);
    Some(Coordinate::new(lat, lon))
}

//! Free-text geocoding against Nominatim / OpenStreetMap.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use async_trait::async_trait;
use reqwest::Client;

use crate::{error::UpstreamError, model::Place, provider::fetch_json};

use super::GeoProvider;

const UPSTREAM: &str = "nominatim";

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl GeoProvider for NominatimGeocoder {
    async fn locate(&self, query: &str) -> Result<Place, UpstreamError> {
        let url = format!("{}/search", self.base_url);
        tracing::debug!(query, "requesting free-text geocode");

        let request = self.http.get(&url).query(&[
            ("q", query),
            ("format", "jsonv2"),
            ("limit", "1"),
            ("addressdetails", "1"),
        ]);

        let body: serde_json::Value = fetch_json(UPSTREAM, request).await?;
        parse_response(&body, query)
    }
}

/// Parses the first search hit. The city falls back to the query text when
/// the hit carries no locality.
fn parse_response(body: &serde_json::Value, query: &str) -> Result<Place, UpstreamError> {
    let results = body
        .as_array()
        .ok_or_else(|| UpstreamError::malformed(UPSTREAM, "response is not an array"))?;

    let first = results
        .first()
        .ok_or_else(|| UpstreamError::malformed(UPSTREAM, format!("no match for '{query}'")))?;

    let coord = |key: &str| {
        first[key]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| UpstreamError::malformed(UPSTREAM, format!("missing {key}")))
    };
    let latitude = coord("lat")?;
    let longitude = coord("lon")?;

    let address = &first["address"];
    let city = ["city", "town", "village", "state"]
        .iter()
        .find_map(|key| address[*key].as_str())
        .unwrap_or(query)
        .to_string();
    let country = address["country"].as_str().unwrap_or_default().to_string();

    Ok(Place {
        city,
        country,
        latitude,
        longitude,
    })
}

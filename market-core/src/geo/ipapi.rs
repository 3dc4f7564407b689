use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::UpstreamError, model::Place, provider::fetch_json};

use super::GeoProvider;

const UPSTREAM: &str = "ipapi";

/// IP geolocation against an ipapi.co compatible service.
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    http: Client,
    base_url: String,
}

impl IpApiLocator {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    city: Option<String>,
    country_name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[async_trait]
impl GeoProvider for IpApiLocator {
    async fn locate(&self, query: &str) -> Result<Place, UpstreamError> {
        let url = format!("{}/{}/json/", self.base_url, query);
        tracing::debug!(%url, "requesting IP geolocation");

        let parsed: IpApiResponse = fetch_json(UPSTREAM, self.http.get(&url)).await?;
        into_place(parsed)
    }
}

fn into_place(parsed: IpApiResponse) -> Result<Place, UpstreamError> {
    if parsed.error {
        let reason = parsed.reason.unwrap_or_else(|| "unspecified error".to_string());
        return Err(UpstreamError::malformed(UPSTREAM, reason));
    }

    let missing = |field: &str| UpstreamError::malformed(UPSTREAM, format!("missing {field}"));

    Ok(Place {
        city: parsed.city.filter(|c| !c.is_empty()).ok_or_else(|| missing("city"))?,
        country: parsed.country_name.unwrap_or_default(),
        latitude: parsed.latitude.ok_or_else(|| missing("latitude"))?,
        longitude: parsed.longitude.ok_or_else(|| missing("longitude"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: serde_json::Value) -> Result<Place, UpstreamError> {
        into_place(serde_json::from_value(body).expect("shape"))
    }

    #[test]
    fn maps_location_fields() {
        let place = parse(serde_json::json!({
            "ip": "49.36.0.1",
            "city": "Mumbai",
            "country_name": "India",
            "latitude": 19.07,
            "longitude": 72.88
        }))
        .expect("valid place");

        assert_eq!(place.city, "Mumbai");
        assert_eq!(place.country, "India");
        assert!((place.latitude - 19.07).abs() < 1e-9);
    }

    #[test]
    fn reserved_address_error_is_malformed() {
        let err = parse(serde_json::json!({
            "ip": "127.0.0.1",
            "error": true,
            "reason": "Reserved IP Address"
        }))
        .unwrap_err();

        assert!(matches!(err, UpstreamError::MalformedPayload { .. }));
        assert!(err.to_string().contains("Reserved IP Address"));
    }

    #[test]
    fn missing_coordinates_are_malformed() {
        let err = parse(serde_json::json!({ "city": "Nowhere" })).unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }
}

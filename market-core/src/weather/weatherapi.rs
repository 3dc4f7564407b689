use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::UpstreamError,
    model::{Place, WeatherReading},
    provider::fetch_json,
};

use super::WeatherProvider;

const UPSTREAM: &str = "weatherapi";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl WeatherApiProvider {
    pub fn new(api_key: String, http: Client, base_url: &str) -> Self {
        Self {
            api_key,
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_current(&self, place: &Place) -> Result<WeatherReading, UpstreamError> {
        let url = format!("{}/v1/current.json", self.base_url);
        let q = format!("{},{}", place.latitude, place.longitude);
        tracing::debug!(%q, "requesting WeatherAPI current weather");

        let request = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", q.as_str())]);

        let parsed: WaResponse = fetch_json(UPSTREAM, request).await?;

        Ok(WeatherReading {
            temperature: parsed.current.temp_c.round(),
            condition: parsed.current.condition.text,
            humidity: parsed.current.humidity.min(100),
            wind: (parsed.current.wind_kph / 3.6).max(0.0),
        })
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn get_weather(&self, place: &Place) -> Result<WeatherReading, UpstreamError> {
        self.fetch_current(place).await
    }
}

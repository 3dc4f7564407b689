use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::UpstreamError,
    model::{Place, WeatherReading},
    provider::fetch_json,
};

use super::WeatherProvider;

const UPSTREAM: &str = "openweather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, http: Client, base_url: &str) -> Self {
        Self {
            api_key,
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_current(&self, place: &Place) -> Result<WeatherReading, UpstreamError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!(lat = place.latitude, lon = place.longitude, "requesting OpenWeather current weather");

        let request = self.http.get(&url).query(&[
            ("lat", place.latitude.to_string()),
            ("lon", place.longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ]);

        let parsed: OwCurrentResponse = fetch_json(UPSTREAM, request).await?;

        let condition = parsed
            .weather
            .first()
            .map(|w| w.main.clone())
            .ok_or_else(|| UpstreamError::malformed(UPSTREAM, "empty weather list"))?;

        Ok(WeatherReading {
            temperature: parsed.main.temp.round(),
            condition,
            humidity: parsed.main.humidity.min(100),
            wind: parsed.wind.speed.max(0.0),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn get_weather(&self, place: &Place) -> Result<WeatherReading, UpstreamError> {
        self.fetch_current(place).await
    }
}

use crate::{
    Config,
    error::UpstreamError,
    model::{Place, WeatherReading},
    provider::{ProviderId, Provenance, Resolved},
    weather::{openweather::OpenWeatherProvider, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use std::fmt::Debug;

pub mod openweather;
pub mod synthetic;
pub mod weatherapi;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, place: &Place) -> Result<WeatherReading, UpstreamError>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
    http: &Client,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `market configure {id}` and enter your API key."
        )
    })?;

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(
            api_key.to_owned(),
            http.clone(),
            &config.endpoints.openweather,
        )),
        ProviderId::WeatherApi => Box::new(WeatherApiProvider::new(
            api_key.to_owned(),
            http.clone(),
            &config.endpoints.weatherapi,
        )),
        ProviderId::SocialBlade => {
            return Err(anyhow::anyhow!("'{id}' is not a weather provider."));
        }
    };

    Ok(boxed)
}

/// Live-or-synthetic weather, decided once at construction.
#[derive(Debug)]
pub enum WeatherSource {
    /// Ask the upstream; synthesize only when it fails.
    Live(Box<dyn WeatherProvider>),
    /// No credential configured.
    Synthetic,
}

impl WeatherSource {
    pub fn from_config(config: &Config, http: &Client) -> anyhow::Result<Self> {
        match config.weather_provider() {
            Some((id, _)) => {
                tracing::debug!(provider = %id, "using live weather provider");
                Ok(Self::Live(provider_from_config(id, config, http)?))
            }
            None => {
                tracing::info!("no weather API key configured, weather will be synthesized");
                Ok(Self::Synthetic)
            }
        }
    }

    /// Current weather at `place`. Never fails.
    pub async fn resolve<R: Rng + Send + ?Sized>(
        &self,
        place: &Place,
        rng: &mut R,
    ) -> Resolved<WeatherReading> {
        let provider = match self {
            Self::Live(provider) => provider,
            Self::Synthetic => {
                return Resolved::new(synthetic::reading(rng), Provenance::Synthetic);
            }
        };

        match provider.get_weather(place).await {
            Ok(reading) => Resolved::new(reading, Provenance::Live),
            Err(err) => {
                tracing::warn!(error = %err, city = %place.city, "weather lookup failed, synthesizing");
                Resolved::new(synthetic::reading(rng), Provenance::Fallback)
            }
        }
    }
}

use std::{convert::TryFrom, time::Duration};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{UpstreamError, truncate_body};

/// Upstreams that take an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    WeatherApi,
    SocialBlade,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::SocialBlade => "socialblade",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[
            ProviderId::OpenWeather,
            ProviderId::WeatherApi,
            ProviderId::SocialBlade,
        ]
    }

    /// Weather providers, in the order they are tried when no default is set.
    pub const fn weather() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi]
    }

    pub fn is_weather(&self) -> bool {
        Self::weather().contains(self)
    }

    /// Environment variable that overrides the stored key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::WeatherApi => "WEATHERAPI_API_KEY",
            ProviderId::SocialBlade => "SOCIALBLADE_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            "socialblade" => Ok(ProviderId::SocialBlade),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherapi, socialblade."
            )),
        }
    }
}

/// Where a stage's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// A live upstream answered.
    Live,
    /// No credential is configured, so the value was generated.
    Synthetic,
    /// A live attempt failed and a substitute was used.
    Fallback,
    /// The stage had nothing to do.
    Skipped,
}

/// A stage result together with its [`Provenance`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Resolved<T> {
    pub fn new(value: T, provenance: Provenance) -> Self {
        Self { value, provenance }
    }
}

/// HTTP client shared by every upstream of one aggregator. Each request gets
/// a single attempt bounded by `timeout`.
pub fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("market-context/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}

/// Send one request and parse a 2xx JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    upstream: &'static str,
    request: RequestBuilder,
) -> Result<T, UpstreamError> {
    let res = request
        .send()
        .await
        .map_err(|e| UpstreamError::from_reqwest(upstream, e))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| UpstreamError::from_reqwest(upstream, e))?;

    if !status.is_success() {
        return Err(UpstreamError::BadStatus {
            upstream,
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| UpstreamError::malformed(upstream, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_parse_is_case_insensitive() {
        assert_eq!(
            ProviderId::try_from("SocialBlade").expect("known provider"),
            ProviderId::SocialBlade
        );
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn only_weather_providers_are_weather() {
        assert!(ProviderId::OpenWeather.is_weather());
        assert!(ProviderId::WeatherApi.is_weather());
        assert!(!ProviderId::SocialBlade.is_weather());
    }
}

//! Orchestration of the geo, weather and social sources into one
//! [`MarketContext`].
//!
//! The geo → weather chain runs concurrently with the social lookup. Each
//! source recovers from its own upstream failures, so the pipeline always
//! has a value per stage; the aggregator only has to decide whether those
//! values are worth returning. When no stage reached a live upstream or a
//! configured synthetic generator, or the pipeline panics, the caller gets
//! [`MarketContext::last_resort`].

use std::panic::AssertUnwindSafe;

use chrono::{DateTime, Datelike, Local, Utc};
use futures::FutureExt;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{
    Config,
    error::ContextError,
    geo::GeoResolver,
    model::{ContextRequest, MarketContext},
    provider::{Provenance, http_client},
    social::SocialSource,
    trend::{self, Season},
    weather::WeatherSource,
};

#[derive(Debug)]
pub struct ContextAggregator {
    geo: GeoResolver,
    weather: WeatherSource,
    social: SocialSource,
    default_handle: Option<String>,
    seed: Option<u64>,
}

impl ContextAggregator {
    pub fn new(geo: GeoResolver, weather: WeatherSource, social: SocialSource) -> Self {
        Self {
            geo,
            weather,
            social,
            default_handle: None,
            seed: None,
        }
    }

    /// Wire every source from `config`. Live or synthetic is decided here,
    /// once, from which API keys are present.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client(config.request_timeout())?;

        Ok(Self {
            geo: GeoResolver::from_config(config, &http),
            weather: WeatherSource::from_config(config, &http)?,
            social: SocialSource::from_config(config, &http),
            default_handle: config.default_handle.clone(),
            seed: config.seed,
        })
    }

    pub fn with_default_handle(mut self, handle: Option<String>) -> Self {
        self.default_handle = handle;
        self
    }

    /// Make the synthetic values reproducible.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Build the market context for `request`. Never fails and never returns
    /// a partial record.
    pub async fn aggregate(&self, request: &ContextRequest) -> MarketContext {
        let now = Local::now();
        let season = Season::from_month(now.month());
        let timestamp = now.with_timezone(&Utc);

        match AssertUnwindSafe(self.run(request, now.month(), timestamp))
            .catch_unwind()
            .await
        {
            Ok(Ok(context)) => {
                tracing::info!(
                    city = %context.place.city,
                    temperature = context.weather.temperature,
                    trend = %context.trend,
                    season = %context.season,
                    "market context ready"
                );
                context
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, identifier = %request.identifier, "using last-resort market context");
                MarketContext::last_resort(timestamp, season)
            }
            Err(_) => {
                tracing::error!(identifier = %request.identifier, "market context pipeline panicked, using last-resort context");
                MarketContext::last_resort(timestamp, season)
            }
        }
    }

    async fn run(
        &self,
        request: &ContextRequest,
        month: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<MarketContext, ContextError> {
        let mut root = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut weather_rng = StdRng::from_rng(&mut root);
        let mut social_rng = StdRng::from_rng(&mut root);
        let mut trend_rng = StdRng::from_rng(&mut root);

        let handle = self.handle_for(request);

        let place_and_weather = async {
            let place = self.geo.resolve(&request.identifier).await;
            let weather = self.weather.resolve(&place.value, &mut weather_rng).await;
            (place, weather)
        };
        let social = async {
            match handle.as_deref() {
                Some(handle) => Some(self.social.resolve(handle, &mut social_rng).await),
                None => None,
            }
        };

        let ((place, weather), social) = tokio::join!(place_and_weather, social);

        let social_provenance = social
            .as_ref()
            .map_or(Provenance::Skipped, |s| s.provenance);
        let provenances = [place.provenance, weather.provenance, social_provenance];
        tracing::debug!(?provenances, "stage provenance (geo, weather, social)");

        if provenances
            .iter()
            .all(|p| matches!(p, Provenance::Fallback | Provenance::Skipped))
        {
            return Err(ContextError::AllUpstreamsFailed);
        }

        let classification = trend::classify(&place.value, &weather.value, month, &mut trend_rng);

        Ok(MarketContext {
            place: place.value,
            weather: weather.value,
            trend: classification.trend,
            season: classification.season,
            social: social.map(|s| s.value),
            timestamp,
        })
    }

    fn handle_for(&self, request: &ContextRequest) -> Option<String> {
        request
            .handle
            .as_deref()
            .or(self.default_handle.as_deref())
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(|h| h.trim_start_matches('@').to_string())
    }
}

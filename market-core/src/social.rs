//! Engagement statistics for a brand handle.

use rand::Rng;
use reqwest::Client;

use crate::{
    Config,
    model::SocialStats,
    provider::{ProviderId, Provenance, Resolved},
    social::socialblade::SocialBladeClient,
};

pub mod socialblade;
pub mod synthetic;

/// Live-or-synthetic social stats, decided once at construction.
#[derive(Debug)]
pub enum SocialSource {
    Live(SocialBladeClient),
    Synthetic,
}

impl SocialSource {
    pub fn from_config(config: &Config, http: &Client) -> Self {
        match config.provider_api_key(ProviderId::SocialBlade) {
            Some(key) => Self::Live(SocialBladeClient::new(
                key.to_owned(),
                http.clone(),
                &config.endpoints.socialblade,
            )),
            None => {
                tracing::info!("no social analytics API key configured, stats will be synthesized");
                Self::Synthetic
            }
        }
    }

    /// Stats for `handle`. Never fails.
    pub async fn resolve<R: Rng + Send + ?Sized>(
        &self,
        handle: &str,
        rng: &mut R,
    ) -> Resolved<SocialStats> {
        let client = match self {
            Self::Live(client) => client,
            Self::Synthetic => {
                return Resolved::new(synthetic::stats(handle, rng), Provenance::Synthetic);
            }
        };

        match client.instagram_user(handle).await {
            Ok(stats) => Resolved::new(stats, Provenance::Live),
            Err(err) => {
                tracing::warn!(error = %err, handle, "social stats lookup failed, synthesizing");
                Resolved::new(synthetic::stats(handle, rng), Provenance::Fallback)
            }
        }
    }
}

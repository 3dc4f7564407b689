use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::UpstreamError,
    model::{RecentPost, SocialStats},
    provider::fetch_json,
};

const UPSTREAM: &str = "socialblade";

/// Campaign name reported for live stats; the upstream has no such field.
pub const CAMPAIGN_NOT_AVAILABLE: &str = "N/A";

/// Instagram statistics from a SocialBlade compatible API.
#[derive(Debug, Clone)]
pub struct SocialBladeClient {
    api_key: String,
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SbUser {
    username: Option<String>,
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    engagement: f64,
    #[serde(default)]
    uploads: u64,
    #[serde(default)]
    average_likes: f64,
    #[serde(default)]
    average_comments: f64,
}

impl SocialBladeClient {
    pub fn new(api_key: String, http: Client, base_url: &str) -> Self {
        Self {
            api_key,
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// One lookup, no retries.
    pub async fn instagram_user(&self, handle: &str) -> Result<SocialStats, UpstreamError> {
        let url = format!("{}/v2/instagram/user/{}", self.base_url, handle);
        tracing::debug!(handle, "requesting SocialBlade instagram stats");

        let request = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())]);

        let parsed: SbUser = fetch_json(UPSTREAM, request).await?;
        Ok(into_stats(parsed, handle))
    }
}

fn into_stats(user: SbUser, handle: &str) -> SocialStats {
    SocialStats {
        handle: user
            .username
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| handle.to_string()),
        followers: user.followers,
        engagement_rate: user.engagement.max(0.0),
        media_count: user.uploads,
        recent_post: RecentPost {
            likes: whole(user.average_likes),
            comments: whole(user.average_comments),
            reach: 0,
            hashtags: Vec::new(),
        },
        latest_campaign: CAMPAIGN_NOT_AVAILABLE.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

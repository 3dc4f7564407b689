use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trend::{Season, Trend};

/// What the caller asks the engine about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextRequest {
    /// An IP address or a free-text place name.
    pub identifier: String,
    #[serde(default)]
    pub handle: Option<String>,
}

impl ContextRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            handle: None,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub city: String,
    pub country: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Place {
    /// Demonstration city used whenever geolocation is unavailable.
    pub fn fallback() -> Self {
        Self {
            city: "Bangalore".to_string(),
            country: "India".to_string(),
            latitude: 12.97,
            longitude: 77.59,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Degrees Celsius.
    pub temperature: f64,
    pub condition: String,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Metres per second.
    pub wind: f64,
}

impl WeatherReading {
    /// Fixed clear-sky reading of the last-resort context.
    pub fn calm() -> Self {
        Self {
            temperature: 25.0,
            condition: "clear".to_string(),
            humidity: 60,
            wind: 1.5,
        }
    }

    pub fn kind(&self) -> Condition {
        Condition::from_description(&self.condition)
    }

    pub fn icon(&self) -> &'static str {
        self.kind().icon()
    }
}

/// Bounded vocabulary behind the free-text condition reported by upstreams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Clear,
    Cloudy,
    Rain,
    Storm,
    Snow,
    Fog,
    Other,
}

impl Condition {
    /// Keyword match over an upstream description such as "light rain" or
    /// "Clouds". Rain is checked before storm, so "thunderstorm with light
    /// rain" counts as rain.
    pub fn from_description(description: &str) -> Self {
        let desc = description.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| desc.contains(w));

        if has(&["rain", "drizzle", "shower"]) {
            Condition::Rain
        } else if has(&["storm", "thunder"]) {
            Condition::Storm
        } else if has(&["snow", "sleet"]) {
            Condition::Snow
        } else if has(&["cloud", "overcast"]) {
            Condition::Cloudy
        } else if has(&["fog", "mist", "haze"]) {
            Condition::Fog
        } else if has(&["clear", "sunny"]) {
            Condition::Clear
        } else {
            Condition::Other
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::Cloudy => "☁️",
            Condition::Rain => "🌧️",
            Condition::Storm => "⛈️",
            Condition::Snow => "❄️",
            Condition::Fog => "🌫️",
            Condition::Other => "🌤️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPost {
    pub likes: u64,
    pub comments: u64,
    pub reach: u64,
    /// At most three, no duplicates.
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialStats {
    pub handle: String,
    pub followers: u64,
    /// Percent.
    pub engagement_rate: f64,
    pub media_count: u64,
    pub recent_post: RecentPost,
    pub latest_campaign: String,
}

/// The engine's only output. Every field but `social` is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    pub place: Place,
    pub weather: WeatherReading,
    pub trend: Trend,
    pub season: Season,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialStats>,
    pub timestamp: DateTime<Utc>,
}

impl MarketContext {
    /// The constant context returned when the pipeline cannot produce anything better.
    pub fn last_resort(timestamp: DateTime<Utc>, season: Season) -> Self {
        Self {
            place: Place::fallback(),
            weather: WeatherReading::calm(),
            trend: Trend::ModernChic,
            season,
            social: None,
            timestamp,
        }
    }
}

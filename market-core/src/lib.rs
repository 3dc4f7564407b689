//! Core library for the `market` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geolocation, weather and social-stats sources, each with a synthetic fallback
//! - The fashion trend classifier
//! - The aggregator that turns all of it into one [`MarketContext`]
//!
//! It is used by `market-cli`, but can also be embedded in other binaries or services.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod geo;
pub mod model;
pub mod provider;
pub mod social;
pub mod trend;
pub mod weather;

pub use aggregator::ContextAggregator;
pub use config::{Config, Endpoints, ProviderConfig};
pub use error::{ContextError, UpstreamError};
pub use geo::{GeoProvider, GeoResolver};
pub use model::{
    Condition, ContextRequest, MarketContext, Place, RecentPost, SocialStats, WeatherReading,
};
pub use provider::{ProviderId, Provenance, Resolved};
pub use social::SocialSource;
pub use trend::{Season, Trend};
pub use weather::{WeatherProvider, WeatherSource};

//! Fashion trend classification.
//!
//! A pure rule set over a [`Place`] and a [`WeatherReading`]. Rules are
//! applied in order and the first match wins:
//!
//! 1. rain-class condition
//! 2. cloud-class condition
//! 3. temperature band, with the pool augmented for regional cities
//!
//! Where a rule offers several labels the pick comes from the injected
//! generator, so a seeded generator gives a reproducible label.

use std::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::model::{Condition, Place, WeatherReading};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "Rain-Ready Fashion")]
    RainReadyFashion,
    #[serde(rename = "Moody Aesthetics")]
    MoodyAesthetics,
    #[serde(rename = "Soft Neutrals")]
    SoftNeutrals,
    #[serde(rename = "Summer Breeze")]
    SummerBreeze,
    #[serde(rename = "Tropical Chic")]
    TropicalChic,
    #[serde(rename = "Light & Airy")]
    LightAndAiry,
    #[serde(rename = "Modern Comfort")]
    ModernComfort,
    #[serde(rename = "Smart Casual")]
    SmartCasual,
    #[serde(rename = "Urban Elegance")]
    UrbanElegance,
    #[serde(rename = "Cozy Layers")]
    CozyLayers,
    #[serde(rename = "Winter Warmth")]
    WinterWarmth,
    #[serde(rename = "Sophisticated Style")]
    SophisticatedStyle,
    #[serde(rename = "Fusion Wear")]
    FusionWear,
    #[serde(rename = "Contemporary Indian")]
    ContemporaryIndian,
    #[serde(rename = "Indo-Western")]
    IndoWestern,
    #[serde(rename = "Modern Chic")]
    ModernChic,
}

impl Trend {
    pub const ALL: [Trend; 16] = [
        Trend::RainReadyFashion,
        Trend::MoodyAesthetics,
        Trend::SoftNeutrals,
        Trend::SummerBreeze,
        Trend::TropicalChic,
        Trend::LightAndAiry,
        Trend::ModernComfort,
        Trend::SmartCasual,
        Trend::UrbanElegance,
        Trend::CozyLayers,
        Trend::WinterWarmth,
        Trend::SophisticatedStyle,
        Trend::FusionWear,
        Trend::ContemporaryIndian,
        Trend::IndoWestern,
        Trend::ModernChic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::RainReadyFashion => "Rain-Ready Fashion",
            Trend::MoodyAesthetics => "Moody Aesthetics",
            Trend::SoftNeutrals => "Soft Neutrals",
            Trend::SummerBreeze => "Summer Breeze",
            Trend::TropicalChic => "Tropical Chic",
            Trend::LightAndAiry => "Light & Airy",
            Trend::ModernComfort => "Modern Comfort",
            Trend::SmartCasual => "Smart Casual",
            Trend::UrbanElegance => "Urban Elegance",
            Trend::CozyLayers => "Cozy Layers",
            Trend::WinterWarmth => "Winter Warmth",
            Trend::SophisticatedStyle => "Sophisticated Style",
            Trend::FusionWear => "Fusion Wear",
            Trend::ContemporaryIndian => "Contemporary Indian",
            Trend::IndoWestern => "Indo-Western",
            Trend::ModernChic => "Modern Chic",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Calendar month (1-12) to season. Hemisphere is not taken into account.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const CLOUDY: &[Trend] = &[Trend::MoodyAesthetics, Trend::SoftNeutrals];
const HOT: &[Trend] = &[Trend::SummerBreeze, Trend::TropicalChic, Trend::LightAndAiry];
const MILD: &[Trend] = &[Trend::ModernComfort, Trend::SmartCasual, Trend::UrbanElegance];
const COLD: &[Trend] = &[
    Trend::CozyLayers,
    Trend::WinterWarmth,
    Trend::SophisticatedStyle,
];

/// Cities whose band pool gains a regional set of labels.
struct RegionalTrends {
    cities: &'static [&'static str],
    trends: &'static [Trend],
}

const REGIONAL: &[RegionalTrends] = &[RegionalTrends {
    cities: &["mumbai", "delhi", "new delhi", "bangalore", "bengaluru"],
    trends: &[
        Trend::FusionWear,
        Trend::ContemporaryIndian,
        Trend::IndoWestern,
    ],
}];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub trend: Trend,
    pub season: Season,
}

/// Classify a market. `month` is the calendar month (1-12) the season is taken from.
pub fn classify<R: Rng + ?Sized>(
    place: &Place,
    weather: &WeatherReading,
    month: u32,
    rng: &mut R,
) -> Classification {
    Classification {
        trend: trend_for(place, weather, rng),
        season: Season::from_month(month),
    }
}

pub fn trend_for<R: Rng + ?Sized>(place: &Place, weather: &WeatherReading, rng: &mut R) -> Trend {
    match weather.kind() {
        Condition::Rain => return Trend::RainReadyFashion,
        Condition::Cloudy => return pick(CLOUDY, rng),
        _ => {}
    }

    let band = temperature_band(weather.temperature);
    let regional = regional_trends(&place.city);
    if regional.is_empty() {
        return pick(band, rng);
    }

    let pool: Vec<Trend> = regional.iter().chain(band).copied().collect();
    pick(&pool, rng)
}

/// Candidate pool for a temperature: above 30, 20 to 30 inclusive, below 20.
pub fn temperature_band(temperature: f64) -> &'static [Trend] {
    if temperature > 30.0 {
        HOT
    } else if temperature >= 20.0 {
        MILD
    } else {
        COLD
    }
}

fn regional_trends(city: &str) -> &'static [Trend] {
    let city = city.trim().to_lowercase();
    REGIONAL
        .iter()
        .find(|r| r.cities.contains(&city.as_str()))
        .map(|r| r.trends)
        .unwrap_or(&[])
}

fn pick<R: Rng + ?Sized>(pool: &[Trend], rng: &mut R) -> Trend {
    // Pools are non-empty constants.
    pool.choose(rng).copied().unwrap_or(Trend::ModernChic)
}

//! Plausible weather for when no upstream reading is available.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::model::WeatherReading;

pub const TEMPERATURE_RANGE: (f64, f64) = (17.0, 35.0);
pub const HUMIDITY_RANGE: (u8, u8) = (30, 90);
pub const WIND_RANGE: (f64, f64) = (0.5, 5.2);
pub const CONDITIONS: &[&str] = &["Sunny", "Cloudy", "Rainy", "Clear", "Stormy"];

pub fn reading<R: Rng + ?Sized>(rng: &mut R) -> WeatherReading {
    let temperature = round_to(rng.random_range(TEMPERATURE_RANGE.0..=TEMPERATURE_RANGE.1), 1);
    let condition = CONDITIONS.choose(rng).copied().unwrap_or("Clear");
    let humidity = rng.random_range(HUMIDITY_RANGE.0..=HUMIDITY_RANGE.1);
    let wind = round_to(rng.random_range(WIND_RANGE.0..=WIND_RANGE.1), 1);

    WeatherReading {
        temperature,
        condition: condition.to_string(),
        humidity,
        wind,
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

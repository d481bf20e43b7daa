//! Weather provider client and weather-aware recommendation analysis.
//!
//! Fetching is a thin reqwest wrapper; the analysis that decides
//! whether indoor venues should be preferred is pure and threshold
//! driven so it can be tested without a network.

use crate::config::WeatherSettings;
use anyhow::Result;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

// Thresholds for the indoor/outdoor decision.
const TEMP_COLD_C: f64 = 10.0;
const TEMP_HOT_C: f64 = 30.0;
const RAIN_THRESHOLD_MM_H: f64 = 0.5;
const WIND_STRONG_KMH: f64 = 20.0;

/// Current conditions as shaped from the provider response.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherObservation {
    pub main: WeatherMain,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub rain: Rain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherMain {
    /// Celsius.
    pub temp: f64,
    #[serde(default)]
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherCondition {
    /// Coarse condition group ("Rain", "Clear", "Clouds", ...).
    pub main: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wind {
    /// Meters per second, per the provider contract.
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rain {
    #[serde(rename = "1h", default)]
    pub one_hour_mm: f64,
}

/// The weather-aware filtering decision plus display context.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherAnalysis {
    pub indoor_preferred: bool,
    pub context: String,
    pub temperature: f64,
    pub condition: String,
    pub rainy: bool,
    pub windy: bool,
}

impl Default for WeatherAnalysis {
    fn default() -> Self {
        Self {
            indoor_preferred: false,
            context: "unknown".to_string(),
            temperature: 20.0,
            condition: String::new(),
            rainy: false,
            windy: false,
        }
    }
}

pub struct WeatherClient {
    client: Client,
    settings: WeatherSettings,
}

impl WeatherClient {
    pub fn new(settings: WeatherSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            settings,
        }
    }

    /// Fetch current conditions for a coordinate, in metric units.
    pub async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherObservation> {
        let url = format!("{}/weather", self.settings.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.settings.api_key.expose_secret().to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch weather from {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        if !response.status().is_success() {
            anyhow::bail!("weather fetch failed with status {}", response.status());
        }

        Ok(response.json().await?)
    }
}

/// Decide whether current conditions favor indoor venues.
pub fn analyze_for_recommendations(observation: &WeatherObservation) -> WeatherAnalysis {
    let temp = observation.main.temp;
    let wind_kmh = observation.wind.speed * 3.6;
    let rain_mm = observation.rain.one_hour_mm;
    let condition = observation
        .weather
        .first()
        .map(|w| w.main.to_lowercase())
        .unwrap_or_default();

    let indoor_preferred = temp < TEMP_COLD_C
        || temp > TEMP_HOT_C
        || rain_mm > RAIN_THRESHOLD_MM_H
        || wind_kmh > WIND_STRONG_KMH
        || matches!(condition.as_str(), "rain" | "thunderstorm" | "snow");

    WeatherAnalysis {
        indoor_preferred,
        context: weather_context(temp, &condition, rain_mm, wind_kmh),
        temperature: temp,
        condition,
        rainy: rain_mm > 0.0,
        windy: wind_kmh > WIND_STRONG_KMH,
    }
}

/// Human-readable summary used in the recommendations header.
fn weather_context(temp: f64, condition: &str, rain_mm: f64, wind_kmh: f64) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if temp < 10.0 {
        parts.push("cold weather");
    } else if temp > 30.0 {
        parts.push("hot weather");
    } else if (20.0..=25.0).contains(&temp) {
        parts.push("pleasant weather");
    }

    if rain_mm > 0.0 {
        parts.push("rainy conditions");
    } else if condition == "clear" {
        parts.push("clear skies");
    } else if condition == "clouds" {
        parts.push("cloudy weather");
    }

    if wind_kmh > 20.0 {
        parts.push("windy conditions");
    }

    if parts.is_empty() {
        "moderate weather conditions".to_string()
    } else {
        parts.join(", ")
    }
}

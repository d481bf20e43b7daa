use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A venue as shown to the user, merged from the taste-graph and
/// venue-details providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,

    /// Star rating, when the details provider had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    /// Price tier rendered as dollar signs ("$" .. "$$$$").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level: Option<String>,

    /// Primary category (restaurant, bar, museum, ...).
    pub category: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,

    /// Taste-graph popularity score in [0, 1], when the venue matched a
    /// taste-graph entity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,

    /// Whether the venue was enriched with taste-graph insights.
    #[serde(default)]
    pub taste_enhanced: bool,

    /// Set by weather-aware filtering: venue suits current conditions.
    #[serde(default)]
    pub weather_match: bool,
}

impl Venue {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: None,
            price_level: None,
            category: category.into(),
            address: None,
            latitude: 0.0,
            longitude: 0.0,
            popularity: None,
            taste_enhanced: false,
            weather_match: false,
        }
    }
}

/// The currently displayed recommendations plus the filters that
/// produced them. Pushed into the chat session before each render so
/// the assistant grounds its answers on what the user actually sees.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub venues: Vec<Venue>,
    pub filters: BTreeMap<String, String>,
}

impl RecommendationSet {
    pub fn new(venues: Vec<Venue>, filters: BTreeMap<String, String>) -> Self {
        Self { venues, filters }
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty() && self.filters.is_empty()
    }
}

/// Convert a numeric price level (1-4) to dollar signs.
pub fn format_price_level(price_level: Option<u8>) -> String {
    match price_level {
        Some(1) => "$".to_string(),
        Some(2) => "$$".to_string(),
        Some(3) => "$$$".to_string(),
        Some(4) => "$$$$".to_string(),
        Some(_) => "Unknown".to_string(),
        None => "Price not available".to_string(),
    }
}

/// Map a dollar-sign budget filter value to its maximum numeric tier.
pub fn budget_to_max_tier(budget: &str) -> Option<u8> {
    match budget {
        "$" => Some(1),
        "$$" => Some(2),
        "$$$" => Some(3),
        "$$$$" => Some(4),
        _ => None,
    }
}

/// Distance between two coordinates in kilometers (haversine).
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    6371.0 * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_level_formatting() {
        assert_eq!(format_price_level(Some(1)), "$");
        assert_eq!(format_price_level(Some(4)), "$$$$");
        assert_eq!(format_price_level(Some(9)), "Unknown");
        assert_eq!(format_price_level(None), "Price not available");
    }

    #[test]
    fn budget_mapping_round_trips() {
        assert_eq!(budget_to_max_tier("$$"), Some(2));
        assert_eq!(budget_to_max_tier("Any"), None);
    }

    #[test]
    fn haversine_zero_distance() {
        assert!(distance_km(37.7749, -122.4194, 37.7749, -122.4194) < 1e-9);
    }

    #[test]
    fn haversine_sf_to_la_roughly_correct() {
        let d = distance_km(37.7749, -122.4194, 34.0522, -118.2437);
        assert!((d - 559.0).abs() < 10.0, "got {}", d);
    }
}

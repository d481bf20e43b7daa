//! Recommendation composition.
//!
//! Pulls taste-graph insights for the user's interests, fetches real
//! venues near the chosen location, enriches them with taste scores,
//! applies budget, distance, and weather-aware filtering, and ranks the
//! result. Falls back to the built-in catalog when every upstream comes
//! back empty.

use crate::models::venue::{budget_to_max_tier, distance_km, format_price_level};
use crate::models::{RecommendationSet, Venue};
use crate::services::metrics::record_upstream_request;
use crate::services::places_client::{Place, PlacesClient};
use crate::services::qloo_client::{QlooClient, TasteEntity};
use crate::services::weather_client::{self, WeatherAnalysis, WeatherClient};
use crate::services::{catalog, qloo_client};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const MAX_RECOMMENDATIONS: usize = 20;

/// Venue types suited to staying indoors.
const INDOOR_TYPES: &[&str] = &[
    "restaurant",
    "bar",
    "cafe",
    "movie_theater",
    "museum",
    "shopping_mall",
    "bowling_alley",
    "casino",
    "night_club",
    "spa",
    "art_gallery",
    "library",
];

/// Venue types that only work in decent weather.
const OUTDOOR_TYPES: &[&str] = &["park", "amusement_park", "zoo", "tourist_attraction"];

/// What the user asked for, already normalized by the handler.
#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub interests: Vec<String>,
    pub budget: String,
    pub category: String,
    pub max_distance_km: f64,
    pub weather_aware: bool,
}

pub struct RecommendationService {
    qloo: Arc<QlooClient>,
    places: Arc<PlacesClient>,
    weather: Arc<WeatherClient>,
}

impl RecommendationService {
    pub fn new(qloo: Arc<QlooClient>, places: Arc<PlacesClient>, weather: Arc<WeatherClient>) -> Self {
        Self {
            qloo,
            places,
            weather,
        }
    }

    /// Run the full pipeline for one request.
    pub async fn recommend(&self, request: &RecommendationRequest) -> RecommendationSet {
        let filters = request_filters(request);

        let insights = self.qloo.category_insights(&request.interests).await;

        let weather = if request.weather_aware {
            match self
                .weather
                .current_weather(request.latitude, request.longitude)
                .await
            {
                Ok(observation) => {
                    record_upstream_request("weather", "ok");
                    Some(weather_client::analyze_for_recommendations(&observation))
                }
                Err(err) => {
                    record_upstream_request("weather", "error");
                    tracing::warn!(error = %err, "weather lookup failed, skipping weather filter");
                    None
                }
            }
        } else {
            None
        };

        let mut venues = Vec::new();
        for place_type in place_types_for(request) {
            match self
                .places
                .search_nearby(request.latitude, request.longitude, place_type, 5000)
                .await
            {
                Ok(places) => {
                    record_upstream_request("places", "ok");
                    venues.extend(places.into_iter().map(|p| place_to_venue(p, place_type)));
                }
                Err(err) => {
                    record_upstream_request("places", "error");
                    tracing::warn!(place_type, error = %err, "nearby search failed");
                }
            }
        }

        if venues.is_empty() {
            tracing::info!("no upstream venues, serving built-in catalog");
            return RecommendationSet::new(
                catalog::demo_recommendations(&filters, MAX_RECOMMENDATIONS),
                filters,
            );
        }

        enhance_with_taste(&mut venues, &insights);
        venues.retain(|v| within_distance(v, request));
        venues.retain(|v| within_budget(v, &request.budget));
        if let Some(analysis) = &weather {
            apply_weather_filter(&mut venues, analysis);
        }

        rank_venues(&mut venues);
        venues.dedup_by(|a, b| a.name == b.name);
        venues.truncate(MAX_RECOMMENDATIONS);

        if venues.is_empty() {
            return RecommendationSet::new(
                catalog::demo_recommendations(&filters, MAX_RECOMMENDATIONS),
                filters,
            );
        }
        RecommendationSet::new(venues, filters)
    }
}

/// Filters as shown to the user and fed into the chat context.
fn request_filters(request: &RecommendationRequest) -> BTreeMap<String, String> {
    let mut filters = BTreeMap::new();
    filters.insert("budget".to_string(), request.budget.clone());
    filters.insert("category".to_string(), request.category.clone());
    filters.insert(
        "distance".to_string(),
        format!("{} km", request.max_distance_km),
    );
    filters.insert(
        "weather_aware".to_string(),
        request.weather_aware.to_string(),
    );
    filters
}

/// Place types to search, from the explicit category or the interests.
fn place_types_for(request: &RecommendationRequest) -> Vec<&'static str> {
    if request.category != "Any" && !request.category.is_empty() {
        if let Some(t) = category_to_place_type(&request.category) {
            return vec![t];
        }
    }
    let mut types: Vec<&'static str> = request
        .interests
        .iter()
        .filter_map(|i| qloo_client::interest_to_category(i))
        .filter_map(category_to_place_type)
        .collect();
    types.dedup();
    if types.is_empty() {
        types.push("restaurant");
    }
    types
}

fn category_to_place_type(category: &str) -> Option<&'static str> {
    match category {
        "restaurant" => Some("restaurant"),
        "bar" => Some("bar"),
        "coffee" | "cafe" => Some("cafe"),
        "museum" => Some("museum"),
        "art" | "art_gallery" => Some("art_gallery"),
        "entertainment" => Some("movie_theater"),
        "shopping" => Some("shopping_mall"),
        "park" => Some("park"),
        "tourist_attraction" => Some("tourist_attraction"),
        _ => None,
    }
}

fn place_to_venue(place: Place, fallback_type: &str) -> Venue {
    let category = place
        .types
        .first()
        .cloned()
        .unwrap_or_else(|| fallback_type.to_string());
    let mut venue = Venue::new(place.name, category);
    venue.rating = place.rating;
    venue.price_level = place.price_level.map(|p| format_price_level(Some(p)));
    venue.address = place.vicinity;
    if let Some(geometry) = place.geometry {
        venue.latitude = geometry.location.lat;
        venue.longitude = geometry.location.lng;
    }
    venue
}

/// Mark venues whose name matches a taste-graph entity and carry over
/// the popularity score.
fn enhance_with_taste(venues: &mut [Venue], insights: &BTreeMap<String, Vec<TasteEntity>>) {
    for venue in venues.iter_mut() {
        let name_lower = venue.name.to_lowercase();
        for entities in insights.values() {
            if let Some(entity) = entities.iter().find(|e| {
                let entity_lower = e.name.to_lowercase();
                entity_lower == name_lower
                    || entity_lower.contains(&name_lower)
                    || name_lower.contains(&entity_lower)
            }) {
                venue.taste_enhanced = true;
                venue.popularity = entity.popularity;
                break;
            }
        }
    }
}

fn within_distance(venue: &Venue, request: &RecommendationRequest) -> bool {
    if venue.latitude == 0.0 && venue.longitude == 0.0 {
        return true;
    }
    distance_km(
        request.latitude,
        request.longitude,
        venue.latitude,
        venue.longitude,
    ) <= request.max_distance_km
}

fn within_budget(venue: &Venue, budget: &str) -> bool {
    let Some(max_tier) = budget_to_max_tier(budget) else {
        return true;
    };
    match venue.price_level.as_deref() {
        None => true,
        Some(price) if price.chars().all(|c| c == '$') => price.len() as u8 <= max_tier,
        Some(_) => true,
    }
}

/// In bad weather keep indoor venues, in good weather prefer but do not
/// require outdoor ones. Matching venues are flagged for the UI.
fn apply_weather_filter(venues: &mut Vec<Venue>, analysis: &WeatherAnalysis) {
    if analysis.indoor_preferred {
        venues.retain(|v| INDOOR_TYPES.contains(&v.category.as_str()));
        for venue in venues.iter_mut() {
            venue.weather_match = true;
        }
    } else {
        for venue in venues.iter_mut() {
            venue.weather_match = OUTDOOR_TYPES.contains(&venue.category.as_str());
        }
    }
}

/// Taste-enhanced venues first, then by rating, then popularity.
fn rank_venues(venues: &mut [Venue]) {
    venues.sort_by(|a, b| {
        b.taste_enhanced
            .cmp(&a.taste_enhanced)
            .then(
                b.rating
                    .unwrap_or(0.0)
                    .partial_cmp(&a.rating.unwrap_or(0.0))
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(
                b.popularity
                    .unwrap_or(0.0)
                    .partial_cmp(&a.popularity.unwrap_or(0.0))
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, category: &str) -> Venue {
        Venue::new(name, category)
    }

    fn analysis(indoor: bool) -> WeatherAnalysis {
        WeatherAnalysis {
            indoor_preferred: indoor,
            context: String::new(),
            temperature: 20.0,
            condition: "Clear".to_string(),
            rainy: indoor,
            windy: false,
        }
    }

    #[test]
    fn taste_matching_is_case_insensitive_and_partial() {
        let mut venues = vec![named("Blue Bottle Coffee", "cafe")];
        let mut insights = BTreeMap::new();
        insights.insert(
            "coffee".to_string(),
            vec![TasteEntity {
                name: "blue bottle".to_string(),
                entity_id: None,
                popularity: Some(0.9),
                types: vec![],
            }],
        );
        enhance_with_taste(&mut venues, &insights);
        assert!(venues[0].taste_enhanced);
        assert_eq!(venues[0].popularity, Some(0.9));
    }

    #[test]
    fn bad_weather_keeps_only_indoor_venues() {
        let mut venues = vec![named("SFMOMA", "museum"), named("Dolores Park", "park")];
        apply_weather_filter(&mut venues, &analysis(true));
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].name, "SFMOMA");
        assert!(venues[0].weather_match);
    }

    #[test]
    fn good_weather_flags_outdoor_without_dropping_indoor() {
        let mut venues = vec![named("SFMOMA", "museum"), named("Dolores Park", "park")];
        apply_weather_filter(&mut venues, &analysis(false));
        assert_eq!(venues.len(), 2);
        assert!(!venues[0].weather_match);
        assert!(venues[1].weather_match);
    }

    #[test]
    fn ranking_puts_taste_enhanced_first() {
        let mut plain = named("Plain", "restaurant");
        plain.rating = Some(4.9);
        let mut enhanced = named("Enhanced", "restaurant");
        enhanced.rating = Some(4.0);
        enhanced.taste_enhanced = true;
        let mut venues = vec![plain, enhanced];
        rank_venues(&mut venues);
        assert_eq!(venues[0].name, "Enhanced");
    }

    #[test]
    fn budget_filter_keeps_unpriced_and_non_dollar_labels() {
        let mut cheap = named("Cheap", "restaurant");
        cheap.price_level = Some("$".to_string());
        let mut pricey = named("Pricey", "restaurant");
        pricey.price_level = Some("$$$$".to_string());
        let unpriced = named("Unpriced", "park");

        assert!(within_budget(&cheap, "$$"));
        assert!(!within_budget(&pricey, "$$"));
        assert!(within_budget(&unpriced, "$$"));
        assert!(within_budget(&pricey, "Any"));
    }

    #[test]
    fn explicit_category_overrides_interest_types() {
        let request = RecommendationRequest {
            latitude: 37.77,
            longitude: -122.42,
            interests: vec!["Coffee Shops".to_string()],
            budget: "Any".to_string(),
            category: "museum".to_string(),
            max_distance_km: 10.0,
            weather_aware: false,
        };
        assert_eq!(place_types_for(&request), vec!["museum"]);
    }

    #[test]
    fn interests_drive_types_when_category_is_any() {
        let request = RecommendationRequest {
            latitude: 37.77,
            longitude: -122.42,
            interests: vec!["Coffee Shops".to_string(), "Museums".to_string()],
            budget: "Any".to_string(),
            category: "Any".to_string(),
            max_distance_km: 10.0,
            weather_aware: false,
        };
        assert_eq!(place_types_for(&request), vec!["cafe", "museum"]);
    }
}

//! Built-in venue catalog.
//!
//! Final fallback when the taste-graph service yields nothing usable:
//! a small fixed set of venues so the UI (and the assistant's
//! grounding context) never goes empty-handed.

use crate::models::Venue;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

fn venue(
    name: &str,
    rating: f64,
    price_level: Option<&str>,
    category: &str,
    address: &str,
    lat: f64,
    lng: f64,
) -> Venue {
    let mut v = Venue::new(name, category);
    v.rating = Some(rating);
    v.price_level = price_level.map(str::to_string);
    v.address = Some(address.to_string());
    v.latitude = lat;
    v.longitude = lng;
    v
}

/// The full catalog, unfiltered.
pub fn all_venues() -> Vec<Venue> {
    vec![
        venue(
            "The French Laundry",
            4.8,
            Some("$$$$"),
            "restaurant",
            "6640 Washington St, Yountville, CA",
            38.4024,
            -122.3631,
        ),
        venue(
            "Tartine Bakery",
            4.5,
            Some("$$"),
            "restaurant",
            "600 Guerrero St, San Francisco, CA",
            37.7609,
            -122.4242,
        ),
        venue(
            "SFMOMA",
            4.6,
            Some("$$$"),
            "museum",
            "151 3rd St, San Francisco, CA",
            37.7857,
            -122.4011,
        ),
        venue(
            "Golden Gate Park",
            4.7,
            None,
            "park",
            "Golden Gate Park, San Francisco, CA",
            37.7694,
            -122.4862,
        ),
        venue(
            "Blue Bottle Coffee",
            4.3,
            Some("$$"),
            "cafe",
            "66 Mint St, San Francisco, CA",
            37.7820,
            -122.4058,
        ),
        venue(
            "The Fillmore",
            4.4,
            Some("$$$"),
            "night_club",
            "1805 Geary Blvd, San Francisco, CA",
            37.7844,
            -122.4324,
        ),
        venue(
            "Chinatown",
            4.2,
            Some("$"),
            "tourist_attraction",
            "Grant Ave, San Francisco, CA",
            37.7941,
            -122.4078,
        ),
        venue(
            "Zuni Cafe",
            4.4,
            Some("$$$"),
            "restaurant",
            "1658 Market St, San Francisco, CA",
            37.7736,
            -122.4216,
        ),
        venue(
            "Exploratorium",
            4.7,
            Some("$$$"),
            "museum",
            "Pier 15, San Francisco, CA",
            37.8017,
            -122.3973,
        ),
        venue(
            "Trick Dog",
            4.5,
            Some("$$"),
            "bar",
            "3010 20th St, San Francisco, CA",
            37.7585,
            -122.4119,
        ),
    ]
}

/// Catalog venues matching the given filters, best-rated first.
///
/// Equal ratings are shuffled so repeat visitors do not always see the
/// identical order.
pub fn demo_recommendations(filters: &BTreeMap<String, String>, limit: usize) -> Vec<Venue> {
    let mut venues: Vec<Venue> = all_venues()
        .into_iter()
        .filter(|v| matches_category(v, filters.get("category").map(String::as_str)))
        .filter(|v| matches_budget(v, filters.get("budget").map(String::as_str)))
        .collect();

    venues.shuffle(&mut rand::thread_rng());
    venues.sort_by(|a, b| {
        b.rating
            .unwrap_or(0.0)
            .partial_cmp(&a.rating.unwrap_or(0.0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    venues.truncate(limit);
    venues
}

fn matches_category(venue: &Venue, category: Option<&str>) -> bool {
    match category {
        None | Some("") | Some("Any") => true,
        Some(wanted) => venue.category == wanted,
    }
}

fn matches_budget(venue: &Venue, budget: Option<&str>) -> bool {
    let Some(max_tier) = budget.and_then(crate::models::venue::budget_to_max_tier) else {
        return true;
    };
    match venue.price_level.as_deref() {
        // Venues without a price tier pass every budget.
        None => true,
        Some(price) => price.len() as u8 <= max_tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_returns_best_rated_first() {
        let venues = demo_recommendations(&BTreeMap::new(), 3);
        assert_eq!(venues.len(), 3);
        assert_eq!(venues[0].name, "The French Laundry");
    }

    #[test]
    fn category_filter_applies() {
        let mut filters = BTreeMap::new();
        filters.insert("category".to_string(), "museum".to_string());
        let venues = demo_recommendations(&filters, 10);
        assert!(!venues.is_empty());
        assert!(venues.iter().all(|v| v.category == "museum"));
    }

    #[test]
    fn budget_filter_excludes_pricier_tiers() {
        let mut filters = BTreeMap::new();
        filters.insert("budget".to_string(), "$$".to_string());
        let venues = demo_recommendations(&filters, 20);
        assert!(venues
            .iter()
            .all(|v| v.price_level.as_deref().map_or(true, |p| p.len() <= 2)));
    }

    #[test]
    fn any_budget_keeps_everything() {
        let mut filters = BTreeMap::new();
        filters.insert("budget".to_string(), "Any".to_string());
        assert_eq!(
            demo_recommendations(&filters, 100).len(),
            all_venues().len()
        );
    }

    #[test]
    fn unpriced_venue_passes_budget_filter() {
        let mut filters = BTreeMap::new();
        filters.insert("budget".to_string(), "$".to_string());
        let venues = demo_recommendations(&filters, 20);
        assert!(venues.iter().any(|v| v.name == "Golden Gate Park"));
    }
}

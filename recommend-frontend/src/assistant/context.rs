//! Grounding-context assembly for chat requests.
//!
//! The context string is a deterministic natural-language summary of
//! whatever recommendations, filters, and interests the session has
//! seen most recently. It is prepended to every chat-completion
//! request; it is never a network call.

use crate::models::{RecommendationSet, UserPreferences, Venue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filter keys worth surfacing to the model. Anything else the UI
/// stores in the filter map is ignored here even if present.
const CONTEXT_FILTER_KEYS: [&str; 4] = ["budget", "category", "distance", "weather_aware"];

/// Venues summarized in the context string at most.
const CONTEXT_VENUE_LIMIT: usize = 3;

/// Interests summarized in the context string at most.
const CONTEXT_INTEREST_LIMIT: usize = 3;

/// Returned when there is nothing to summarize.
pub const NO_CONTEXT_SENTINEL: &str = "No current context available.";

/// The session's cached view of the data the assistant grounds on.
///
/// Rebuilt (overwritten) from caller-supplied data before each render,
/// so the assistant always reflects the recommendations on screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub venues: Vec<Venue>,
    pub filters: BTreeMap<String, String>,
    pub interests: Vec<String>,
}

impl ContextSnapshot {
    pub fn from_parts(recommendations: &RecommendationSet, preferences: &UserPreferences) -> Self {
        Self {
            venues: recommendations.venues.clone(),
            filters: recommendations.filters.clone(),
            interests: preferences.interests.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty() && self.filters.is_empty() && self.interests.is_empty()
    }

    /// Build the grounding context string.
    ///
    /// Pure function of the snapshot: the same venues, filters, and
    /// interests always produce the same string. Sections are joined
    /// with blank lines; an empty snapshot yields the fixed sentinel.
    pub fn to_context_string(&self) -> String {
        let mut sections: Vec<String> = Vec::new();

        if !self.venues.is_empty() {
            let lines: Vec<String> = self
                .venues
                .iter()
                .take(CONTEXT_VENUE_LIMIT)
                .map(venue_line)
                .collect();
            sections.push(format!("Current top recommendations:\n{}", lines.join("\n")));
        }

        // Iterate the allow-list, not the map, so ordering is fixed.
        let filter_lines: Vec<String> = CONTEXT_FILTER_KEYS
            .iter()
            .filter_map(|key| {
                self.filters
                    .get(*key)
                    .filter(|value| !value.is_empty())
                    .map(|value| format!("- {}: {}", key, value))
            })
            .collect();
        if !filter_lines.is_empty() {
            sections.push(format!("Current filters:\n{}", filter_lines.join("\n")));
        }

        if !self.interests.is_empty() {
            let interests: Vec<&str> = self
                .interests
                .iter()
                .take(CONTEXT_INTEREST_LIMIT)
                .map(String::as_str)
                .collect();
            sections.push(format!("User interests: {}", interests.join(", ")));
        }

        if sections.is_empty() {
            NO_CONTEXT_SENTINEL.to_string()
        } else {
            sections.join("\n\n")
        }
    }
}

fn venue_line(venue: &Venue) -> String {
    let rating = venue
        .rating
        .map(|r| format!("{}", r))
        .unwrap_or_else(|| "N/A".to_string());
    let price = venue.price_level.as_deref().unwrap_or("N/A");
    format!("- {}: {} stars, {} price level", venue.name, rating, price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(name: &str, rating: f64, price: &str) -> Venue {
        let mut v = Venue::new(name, "restaurant");
        v.rating = Some(rating);
        v.price_level = Some(price.to_string());
        v
    }

    fn snapshot_with_all() -> ContextSnapshot {
        let mut filters = BTreeMap::new();
        filters.insert("budget".to_string(), "$$".to_string());
        filters.insert("category".to_string(), "restaurant".to_string());
        ContextSnapshot {
            venues: vec![venue("Cafe A", 4.5, "$$")],
            filters,
            interests: vec!["Fine Dining".to_string()],
        }
    }

    #[test]
    fn empty_snapshot_yields_sentinel() {
        let snapshot = ContextSnapshot::default();
        assert_eq!(snapshot.to_context_string(), NO_CONTEXT_SENTINEL);
    }

    #[test]
    fn context_is_deterministic() {
        let snapshot = snapshot_with_all();
        assert_eq!(snapshot.to_context_string(), snapshot.to_context_string());
    }

    #[test]
    fn venue_filter_and_interest_lines_present() {
        let context = snapshot_with_all().to_context_string();
        assert!(context.contains("Cafe A: 4.5 stars, $$ price level"));
        assert!(context.contains("budget: $$"));
        assert!(context.contains("category: restaurant"));
        assert!(context.contains("User interests: Fine Dining"));
    }

    #[test]
    fn sections_joined_with_blank_lines() {
        let context = snapshot_with_all().to_context_string();
        assert_eq!(context.matches("\n\n").count(), 2);
    }

    #[test]
    fn only_top_three_venues_summarized() {
        let mut snapshot = ContextSnapshot::default();
        for i in 0..5 {
            snapshot
                .venues
                .push(venue(&format!("Venue {}", i), 4.0, "$"));
        }
        let context = snapshot.to_context_string();
        assert!(context.contains("Venue 2"));
        assert!(!context.contains("Venue 3"));
    }

    #[test]
    fn unlisted_filter_keys_ignored() {
        let mut snapshot = ContextSnapshot::default();
        snapshot
            .filters
            .insert("internal_page".to_string(), "2".to_string());
        assert_eq!(snapshot.to_context_string(), NO_CONTEXT_SENTINEL);
    }

    #[test]
    fn empty_filter_values_ignored() {
        let mut snapshot = ContextSnapshot::default();
        snapshot.filters.insert("budget".to_string(), String::new());
        assert_eq!(snapshot.to_context_string(), NO_CONTEXT_SENTINEL);
    }

    #[test]
    fn interests_capped_at_three() {
        let mut snapshot = ContextSnapshot::default();
        snapshot.interests = vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
        ];
        let context = snapshot.to_context_string();
        assert!(context.contains("User interests: a, b, c"));
        assert!(!context.contains("d"));
    }

    #[test]
    fn missing_rating_and_price_render_na() {
        let mut snapshot = ContextSnapshot::default();
        snapshot.venues.push(Venue::new("Mystery Spot", "bar"));
        let context = snapshot.to_context_string();
        assert!(context.contains("Mystery Spot: N/A stars, N/A price level"));
    }
}

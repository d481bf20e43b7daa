//! Taste-graph recommendation API client.
//!
//! Thin request construction and response shaping over the hosted
//! taste-graph service; ranking itself happens upstream.

use crate::config::QlooSettings;
use anyhow::Result;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Entities fetched per category search.
const SEARCH_LIMIT: usize = 20;

/// A ranked entity returned by the taste-graph service.
#[derive(Debug, Clone, Deserialize)]
pub struct TasteEntity {
    pub name: String,
    #[serde(default)]
    pub entity_id: Option<String>,
    /// Popularity score in [0, 1].
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TasteEntity>,
}

pub struct QlooClient {
    client: Client,
    settings: QlooSettings,
}

impl QlooClient {
    pub fn new(settings: QlooSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            settings,
        }
    }

    /// Search taste-graph entities for one category keyword.
    pub async fn search_entities(&self, category: &str) -> Result<Vec<TasteEntity>> {
        let url = format!("{}/search", self.settings.base_url);

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", self.settings.api_key.expose_secret())
            .query(&[
                ("query", category.to_lowercase().as_str()),
                ("limit", &SEARCH_LIMIT.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send taste-graph search to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        if !response.status().is_success() {
            anyhow::bail!("taste-graph search failed with status {}", response.status());
        }

        let body: SearchResponse = response.json().await?;
        tracing::debug!(
            category = category,
            results = body.results.len(),
            "taste-graph search completed"
        );
        Ok(body.results)
    }

    /// Fetch insights for each of the user's interests, keyed by the
    /// mapped category. Interests with no mapping are skipped; a failed
    /// category is logged and skipped rather than failing the batch.
    pub async fn category_insights(
        &self,
        interests: &[String],
    ) -> BTreeMap<String, Vec<TasteEntity>> {
        let mut insights = BTreeMap::new();

        for interest in interests {
            let Some(category) = interest_to_category(interest) else {
                continue;
            };
            if insights.contains_key(category) {
                continue;
            }
            match self.search_entities(category).await {
                Ok(entities) if !entities.is_empty() => {
                    insights.insert(category.to_string(), entities);
                }
                Ok(_) => {
                    tracing::warn!(category, "no taste-graph entities found");
                }
                Err(e) => {
                    tracing::error!(category, error = %e, "taste-graph category lookup failed");
                }
            }
        }

        insights
    }
}

/// Map a user-facing interest label to a taste-graph search category.
pub fn interest_to_category(interest: &str) -> Option<&'static str> {
    match interest {
        "Fine Dining" | "Casual Dining" => Some("restaurant"),
        "Bars & Nightlife" => Some("bar"),
        "Coffee Shops" => Some("coffee"),
        "Museums" => Some("museum"),
        "Art Galleries" => Some("art"),
        "Entertainment" => Some("entertainment"),
        "Shopping" => Some("shopping"),
        "Outdoor Activities" => Some("park"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_parses() {
        let body = r#"{
            "results": [
                {"name": "Zuni Cafe", "entity_id": "e1", "popularity": 0.82, "types": ["urn:entity:place"]},
                {"name": "Nopa", "popularity": 0.77}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].name, "Zuni Cafe");
        assert_eq!(parsed.results[1].popularity, Some(0.77));
        assert!(parsed.results[1].types.is_empty());
    }

    #[test]
    fn empty_response_parses() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn interest_mapping_covers_known_labels() {
        assert_eq!(interest_to_category("Fine Dining"), Some("restaurant"));
        assert_eq!(interest_to_category("Casual Dining"), Some("restaurant"));
        assert_eq!(interest_to_category("Museums"), Some("museum"));
        assert_eq!(interest_to_category("Knitting"), None);
    }
}

//! Venue-details provider client.
//!
//! Request construction and response shaping for the places API:
//! nearby search, per-place details, text search, and photo URLs.

use crate::config::PlacesSettings;
use anyhow::Result;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

/// A place as returned by search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Numeric tier 1-4 on the wire.
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Detailed fields fetched for one place.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    result: Option<PlaceDetails>,
}

pub struct PlacesClient {
    client: Client,
    settings: PlacesSettings,
}

impl PlacesClient {
    pub fn new(settings: PlacesSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            settings,
        }
    }

    /// Search for places of one type around a coordinate.
    pub async fn search_nearby(
        &self,
        lat: f64,
        lng: f64,
        place_type: &str,
        radius_m: u32,
    ) -> Result<Vec<Place>> {
        let url = format!("{}/nearbysearch/json", self.settings.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("location", format!("{},{}", lat, lng)),
                ("radius", radius_m.to_string()),
                ("type", place_type.to_string()),
                ("key", self.settings.api_key.expose_secret().to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send nearby search to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        if !response.status().is_success() {
            anyhow::bail!("nearby search failed with status {}", response.status());
        }

        let body: SearchResults = response.json().await?;
        Ok(body.results)
    }

    /// Fetch the detail fields the UI renders for one place.
    pub async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>> {
        let url = format!("{}/details/json", self.settings.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("place_id", place_id),
                (
                    "fields",
                    "name,rating,formatted_phone_number,formatted_address,website,price_level",
                ),
                ("key", self.settings.api_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            anyhow::bail!("place details failed with status {}", response.status());
        }

        let body: DetailsResult = response.json().await?;
        Ok(body.result)
    }

    /// Free-text place search, optionally biased to a coordinate.
    pub async fn search_by_text(&self, query: &str, near: Option<(f64, f64)>) -> Result<Vec<Place>> {
        let url = format!("{}/textsearch/json", self.settings.base_url);

        let mut request = self.client.get(&url).query(&[
            ("query", query),
            ("key", self.settings.api_key.expose_secret()),
        ]);
        if let Some((lat, lng)) = near {
            request = request.query(&[("location", format!("{},{}", lat, lng))]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            anyhow::bail!("text search failed with status {}", response.status());
        }

        let body: SearchResults = response.json().await?;
        Ok(body.results)
    }

    /// URL for a place photo at the given maximum width.
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        format!(
            "{}/photo?maxwidth={}&photoreference={}&key={}",
            self.settings.base_url,
            max_width,
            photo_reference,
            self.settings.api_key.expose_secret()
        )
    }
}

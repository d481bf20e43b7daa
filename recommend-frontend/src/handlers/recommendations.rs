//! Recommendation form handler.

use crate::handlers::chat::{PREFERENCES_SESSION_KEY, RECOMMENDATIONS_SESSION_KEY};
use crate::models::{RecommendationSet, UserPreferences, Venue};
use crate::services::recommendation::RecommendationRequest;
use crate::AppState;
use askama::Template;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Form;
use serde::Deserialize;
use service_core::error::AppError;
use tower_sessions::Session;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct RecommendationForm {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Comma-separated interest labels from the multi-select.
    #[serde(default)]
    pub interests: String,

    #[serde(default = "default_any")]
    pub budget: String,

    #[serde(default = "default_any")]
    pub category: String,

    #[serde(default = "default_distance")]
    #[validate(range(min = 0.5, max = 50.0))]
    pub max_distance_km: f64,

    /// Checkbox: present when checked.
    #[serde(default)]
    pub weather_aware: Option<String>,
}

fn default_any() -> String {
    "Any".to_string()
}

fn default_distance() -> f64 {
    10.0
}

#[derive(Template)]
#[template(path = "venue_list.html")]
pub struct VenueListTemplate {
    pub venues: Vec<Venue>,
}

/// POST /recommendations: run the pipeline and render the venue list.
/// The result set and preferences are stored in the session so the
/// assistant can ground its answers on them.
pub async fn recommendations(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RecommendationForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;

    let interests: Vec<String> = form
        .interests
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let request = RecommendationRequest {
        latitude: form.latitude,
        longitude: form.longitude,
        interests: interests.clone(),
        budget: form.budget,
        category: form.category,
        max_distance_km: form.max_distance_km,
        weather_aware: form.weather_aware.is_some(),
    };

    let set: RecommendationSet = state.recommendations.recommend(&request).await;
    let preferences = UserPreferences {
        name: (!form.name.is_empty()).then_some(form.name),
        interests,
        liked_venues: Vec::new(),
    };

    session
        .insert(RECOMMENDATIONS_SESSION_KEY, &set)
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("session write failed: {}", e)))?;
    session
        .insert(PREFERENCES_SESSION_KEY, &preferences)
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("session write failed: {}", e)))?;

    tracing::info!(venues = set.venues.len(), "recommendations rendered");
    Ok(VenueListTemplate { venues: set.venues })
}

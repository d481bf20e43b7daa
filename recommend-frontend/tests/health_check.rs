use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use recommend_frontend::config::{
    AssistantSettings, PlacesSettings, QlooSettings, WeatherSettings,
};
use recommend_frontend::services::chat::ChatService;
use recommend_frontend::services::places_client::PlacesClient;
use recommend_frontend::services::qloo_client::QlooClient;
use recommend_frontend::services::recommendation::RecommendationService;
use recommend_frontend::services::weather_client::WeatherClient;
use recommend_frontend::startup::build_router;
use recommend_frontend::AppState;
use secrecy::Secret;
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_state() -> AppState {
    let assistant = AssistantSettings {
        api_key: Secret::new(String::new()),
        model: "test-model".to_string(),
        max_tokens: 64,
        temperature: 0.0,
    };
    let qloo = QlooSettings {
        api_key: Secret::new("test".to_string()),
        base_url: "http://localhost:1".to_string(),
    };
    let places = PlacesSettings {
        api_key: Secret::new("test".to_string()),
        base_url: "http://localhost:1".to_string(),
    };
    let weather = WeatherSettings {
        api_key: Secret::new("test".to_string()),
        base_url: "http://localhost:1".to_string(),
    };

    AppState::new(
        Arc::new(ChatService::new(assistant)),
        Arc::new(RecommendationService::new(
            Arc::new(QlooClient::new(qloo)),
            Arc::new(PlacesClient::new(places)),
            Arc::new(WeatherClient::new(weather)),
        )),
    )
}

#[tokio::test]
async fn health_check_works() {
    let app = build_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn index_renders() {
    let app = build_router(test_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_endpoint_responds() {
    service_core::observability::init_metrics();
    let app = build_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

use dotenvy::dotenv;
use recommend_frontend::config::get_configuration;
use recommend_frontend::services::chat::ChatService;
use recommend_frontend::services::places_client::PlacesClient;
use recommend_frontend::services::qloo_client::QlooClient;
use recommend_frontend::services::recommendation::RecommendationService;
use recommend_frontend::services::weather_client::WeatherClient;
use recommend_frontend::startup::build_router;
use recommend_frontend::AppState;
use service_core::observability::logging::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("recommend-frontend", "info");

    service_core::observability::init_metrics();
    recommend_frontend::services::metrics::init_service_metrics();

    let chat = Arc::new(ChatService::new(configuration.assistant.clone()));
    let recommendations = Arc::new(RecommendationService::new(
        Arc::new(QlooClient::new(configuration.qloo.clone())),
        Arc::new(PlacesClient::new(configuration.places.clone())),
        Arc::new(WeatherClient::new(configuration.weather.clone())),
    ));

    let app = build_router(AppState::new(chat, recommendations));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting recommend-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}

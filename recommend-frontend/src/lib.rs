pub mod assistant;
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::chat::ChatService;
use services::recommendation::RecommendationService;
use std::sync::Arc;

/// Shared application state containing service clients
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(chat: Arc<ChatService>, recommendations: Arc<RecommendationService>) -> Self {
        Self {
            chat,
            recommendations,
        }
    }
}

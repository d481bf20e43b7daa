pub mod catalog;
pub mod chat;
pub mod metrics;
pub mod places_client;
pub mod providers;
pub mod qloo_client;
pub mod recommendation;
pub mod weather_client;

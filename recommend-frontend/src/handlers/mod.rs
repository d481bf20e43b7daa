pub mod app;
pub mod chat;
pub mod metrics;
pub mod recommendations;

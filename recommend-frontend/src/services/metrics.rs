//! Service-level Prometheus collectors.
//!
//! Registered into the shared registry from `service-core` so they are
//! exported alongside the HTTP request metrics.

use prometheus::{IntCounter, IntCounterVec, Opts};
use std::sync::OnceLock;

pub static CHAT_MESSAGES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static CHAT_RETRIES_TOTAL: OnceLock<IntCounter> = OnceLock::new();
pub static CHAT_FALLBACKS_TOTAL: OnceLock<IntCounter> = OnceLock::new();
pub static UPSTREAM_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Register the service collectors. Call once at startup, after
/// `service_core::observability::init_metrics`.
pub fn init_service_metrics() {
    let Some(registry) = service_core::observability::registry() else {
        tracing::warn!("metrics registry not initialized, service collectors skipped");
        return;
    };

    let messages = IntCounterVec::new(
        Opts::new("chat_messages_total", "Chat submissions by outcome"),
        &["outcome"],
    )
    .expect("metric can be created");
    let retries = IntCounter::new(
        "chat_retries_total",
        "Chat completions retried after a suspect response",
    )
    .expect("metric can be created");
    let fallbacks = IntCounter::new(
        "chat_fallbacks_total",
        "Chat exchanges answered with the fixed fallback message",
    )
    .expect("metric can be created");
    let upstream = IntCounterVec::new(
        Opts::new(
            "upstream_requests_total",
            "Requests to upstream APIs by service and outcome",
        ),
        &["service", "outcome"],
    )
    .expect("metric can be created");

    let _ = registry.register(Box::new(messages.clone()));
    let _ = registry.register(Box::new(retries.clone()));
    let _ = registry.register(Box::new(fallbacks.clone()));
    let _ = registry.register(Box::new(upstream.clone()));

    let _ = CHAT_MESSAGES_TOTAL.set(messages);
    let _ = CHAT_RETRIES_TOTAL.set(retries);
    let _ = CHAT_FALLBACKS_TOTAL.set(fallbacks);
    let _ = UPSTREAM_REQUESTS_TOTAL.set(upstream);
}

pub fn record_chat_outcome(outcome: &str) {
    if let Some(counter) = CHAT_MESSAGES_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_chat_retry() {
    if let Some(counter) = CHAT_RETRIES_TOTAL.get() {
        counter.inc();
    }
}

pub fn record_chat_fallback() {
    if let Some(counter) = CHAT_FALLBACKS_TOTAL.get() {
        counter.inc();
    }
}

pub fn record_upstream_request(service: &str, outcome: &str) {
    if let Some(counter) = UPSTREAM_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[service, outcome]).inc();
    }
}

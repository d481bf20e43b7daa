use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

// Global registry shared by the middleware and service-level collectors
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize the shared registry and the HTTP request collectors.
///
/// Idempotent: repeated calls keep the first registry. Services register
/// their own collectors into the same registry via [`registry`].
pub fn init_metrics() {
    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("metric can be created");

    let request_duration = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )
    .expect("metric can be created");

    registry
        .register(Box::new(requests_total.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(request_duration.clone()))
        .expect("collector can be registered");

    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(request_duration);
}

/// The shared registry, if [`init_metrics`] has run.
pub fn registry() -> Option<&'static Registry> {
    REGISTRY.get()
}

/// Encode all registered metrics in the Prometheus text format.
pub fn render_metrics() -> String {
    let Some(registry) = REGISTRY.get() else {
        return String::new();
    };
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_before_init_is_empty() {
        // A fresh process may or may not have the registry set depending on
        // test ordering, so only assert that rendering never panics.
        let _ = render_metrics();
    }

    #[test]
    fn init_is_idempotent() {
        init_metrics();
        init_metrics();
        assert!(registry().is_some());
    }
}

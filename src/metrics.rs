// Metrics and observability module
// This file registers the prometheus collectors for upstream calls and
// mock fallbacks, and renders them for the /metrics endpoint
//
// Numan Thabit 2025 Nov

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

pub static REQ_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "dash_upstream_latency_seconds",
        "latency for Marketplace calls",
        &["service", "method"]
    )
    .unwrap()
});

pub static REQ_ERRORS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "dash_upstream_errors_total",
        "errors by Marketplace call",
        &["service", "method"]
    )
    .unwrap()
});

pub static MOCK_FALLBACKS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "dash_mock_fallbacks_total",
        "responses served from mock data after an upstream failure",
        &["resource"]
    )
    .unwrap()
});

/// Text exposition of every collector in the default registry.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    if let Err(err) = encoder.encode(&prometheus::gather(), &mut buf) {
        tracing::warn!(error = %err, "metrics encoding failed");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

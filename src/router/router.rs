// Router HTTP API implementation
// This file wires the proxy endpoints, the dashboard pages and the
// CORS and tracing middleware into one axum router
//
// Numan Thabit 2025 Nov

use axum::{
    http::{header, Method},
    routing::get,
    Router as AxumRouter,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::pages::{dashboard_json, dashboard_page, health_check, metrics_text};
use super::proxy::{proxy_extensions, proxy_stats};
use crate::state::AppState;

/// Any origin may call the API; preflights advertise GET and OPTIONS.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the HTTP router with API endpoints
pub fn create_api_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(dashboard_page))
        .route("/dashboard", get(dashboard_page))
        .route("/api/dashboard", get(dashboard_json))
        .route("/api/stats", get(proxy_stats))
        .route("/api/extensions", get(proxy_extensions))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_text))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

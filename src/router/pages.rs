// Dashboard and service endpoints
// The HTML dashboard, its JSON view model, health and metrics
//
// Numan Thabit 2025 Nov

use crate::dashboard::{DashboardParams, DashboardView};
use crate::errors::{ApiError, DashError};
use crate::metrics;
use crate::render::render_dashboard;
use crate::state::AppState;
use crate::transport::marketplace::is_valid_name;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use tracing::{debug, error};

async fn load_view(state: &AppState, params: &DashboardParams) -> Result<DashboardView, ApiError> {
    let extension = params
        .extension
        .as_deref()
        .filter(|e| !e.is_empty())
        .unwrap_or(state.config.default_extension.as_str());
    if !is_valid_name(extension) {
        return Err(ApiError::new(
            "stats",
            DashError::InvalidExtension(extension.to_string()),
        ));
    }

    let (stats, extensions) = futures::join!(
        state.source.load_stats(extension),
        state.source.load_extensions()
    );
    debug!(
        extension = extension,
        source = ?stats.source,
        days = stats.data.daily_stats.len(),
        "dashboard data loaded"
    );

    Ok(DashboardView::build(
        &stats.data,
        stats.source,
        stats.notice,
        extensions.data,
        state.source.days(),
        params,
    ))
}

/// GET / and /dashboard
pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Response, ApiError> {
    let view = load_view(&state, &params).await?;
    match render_dashboard(&view) {
        Ok(html) => Ok(Html(html).into_response()),
        Err(err) => {
            error!(error = %err, "dashboard rendering failed");
            Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

/// GET /api/dashboard
pub async fn dashboard_json(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardView>, ApiError> {
    load_view(&state, &params).await.map(Json)
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Prometheus text exposition
pub async fn metrics_text() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}

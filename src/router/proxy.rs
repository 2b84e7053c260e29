// Marketplace proxy endpoints
// Authenticated pass-through of extension statistics and the reshaped
// publisher extension listing
//
// Numan Thabit 2025 Nov

use crate::errors::{ApiError, DashError};
use crate::model::Extension;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub aggregate: Option<String>,
    #[serde(rename = "afterDate")]
    pub after_date: Option<String>,
    pub extension: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// GET /api/stats - upstream statistics JSON, unchanged
pub async fn proxy_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let fail = |err: DashError| ApiError::new("stats", err);

    let client = state
        .source
        .client()
        .ok_or_else(|| fail(DashError::MissingToken))?;

    let aggregate = non_empty(&query.aggregate).unwrap_or("1");
    let after_date = query.after_date.as_deref().unwrap_or_default();
    let extension =
        non_empty(&query.extension).unwrap_or(state.config.default_extension.as_str());

    let body = client
        .extension_stats(state.source.publisher(), extension, aggregate, after_date)
        .await
        .map_err(|err| {
            warn!(error = %err, extension = extension, "stats proxy failed");
            fail(err)
        })?;

    info!(extension = extension, aggregate = aggregate, "stats proxied");
    Ok(Json(body))
}

/// GET /api/extensions - the publisher's extensions as `Extension` records
pub async fn proxy_extensions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Extension>>, ApiError> {
    let fail = |err: DashError| ApiError::new("extensions", err);

    let client = state
        .source
        .client()
        .ok_or_else(|| fail(DashError::MissingToken))?;

    let extensions = client
        .publisher_extensions(state.source.publisher())
        .await
        .map_err(|err| {
            warn!(error = %err, "extensions proxy failed");
            fail(err)
        })?;

    info!(count = extensions.len(), "extensions listed");
    Ok(Json(extensions))
}

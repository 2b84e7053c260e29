// Error types and error handling module
// This file defines the dashboard error type and its mapping onto
// JSON HTTP responses for the proxy endpoints
//
// Numan Thabit 2025 Nov

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("PAT token is required")]
    MissingToken,
    #[error("invalid extension name: {0}")]
    InvalidExtension(String),
    #[error("upstream returned {status} {status_text}")]
    Upstream { status: u16, status_text: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl DashError {
    pub fn upstream(status: reqwest::StatusCode) -> Self {
        Self::Upstream {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

/// A [`DashError`] tagged with the upstream resource it was raised for, so
/// the response names what failed to load.
#[derive(Debug)]
pub struct ApiError {
    pub resource: &'static str,
    pub source: DashError,
}

impl ApiError {
    pub fn new(resource: &'static str, source: DashError) -> Self {
        Self { resource, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.source {
            DashError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "PAT token is required" })),
            )
                .into_response(),
            DashError::InvalidExtension(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid extension name" })),
            )
                .into_response(),
            DashError::Upstream {
                status,
                status_text,
            } => {
                let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (
                    code,
                    Json(json!({
                        "error": format!("Failed to fetch {} from VS Code Marketplace", self.resource),
                        "status": status,
                        "statusText": status_text,
                    })),
                )
                    .into_response()
            }
            err @ (DashError::Transport(_) | DashError::Decode(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error",
                    "message": err.to_string(),
                })),
            )
                .into_response(),
        }
    }
}

//! Health check handler

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::{ApiResponse, error_codes};
use super::helpers::now_ms;

/// Health check response data
#[derive(serde::Serialize, serde::Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
    /// Build revision
    #[schema(example = "a1b2c3d")]
    pub version: String,
}

/// Health check endpoint
///
/// Pings the database on every call. Does NOT expose internal details.
///
/// - Healthy: 200 OK + {code: 0, data: {timestamp_ms, version}}
/// - Unhealthy: 503 Service Unavailable + {code: 5001, msg: "unavailable"}
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(HealthResponse {
                timestamp_ms: now_ms(),
                version: env!("GIT_HASH").to_string(),
            })),
        ),
        Err(e) => {
            tracing::error!("[HEALTH] Database ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    code: error_codes::SERVICE_UNAVAILABLE,
                    msg: "unavailable".to_string(),
                    data: None,
                }),
            )
        }
    }
}

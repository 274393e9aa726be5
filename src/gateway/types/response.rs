//! API response types and error codes
//!
//! - `ApiResponse<T>`: `{code, msg, data}` wrapper (errors, health)
//! - `ApiError`: handler error, rendered as `ApiResponse<()>` with an HTTP status
//! - `error_codes`: standard error code constants
//! - Order endpoint bodies (`OrderCreatedData`, `MessageData`)

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::orders::OrderError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "ok")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// Handler Errors
// ============================================================================

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    /// Body that parsed badly or broke a field constraint
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            error_codes::INVALID_PARAMETER,
            msg,
        )
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::ORDER_NOT_FOUND, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiResponse::<()>::error(self.code, self.msg)),
        )
            .into_response()
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => Self::not_found(format!("Order #{} not found", id)),
            OrderError::InvalidStatus(status) => Self::new(
                StatusCode::BAD_REQUEST,
                error_codes::INVALID_STATUS,
                format!("Invalid status: {}", status),
            ),
            OrderError::InvalidOrder(msg) => Self::unprocessable(msg),
            OrderError::Database(_) | OrderError::Corrupt { .. } => {
                tracing::error!("Order operation failed: {}", err);
                Self::internal("Internal error")
            }
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// POST /order response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderCreatedData {
    #[schema(example = "Order created")]
    pub message: String,
    #[schema(example = 1)]
    pub order_id: i64,
}

/// Plain acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageData {
    #[schema(example = "Order #1 sent to printer")]
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INVALID_STATUS: i32 = 1004;

    // Resource errors (4xxx)
    pub const ORDER_NOT_FOUND: i32 = 4001;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_error_mapping() {
        let e = ApiError::from(OrderError::NotFound(3));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.code, error_codes::ORDER_NOT_FOUND);
        assert_eq!(e.msg, "Order #3 not found");

        let e = ApiError::from(OrderError::InvalidStatus("shipped".to_string()));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.code, error_codes::INVALID_STATUS);

        let e = ApiError::from(OrderError::InvalidOrder("qty".to_string()));
        assert_eq!(e.status, StatusCode::UNPROCESSABLE_ENTITY);

        let e = ApiError::from(OrderError::Corrupt {
            id: 1,
            reason: "items".to_string(),
        });
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.msg, "Internal error", "internal details are not exposed");
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ApiResponse::<()>::error(
            error_codes::INVALID_STATUS,
            "Invalid status: shipped",
        ))
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"code": 1004, "msg": "Invalid status: shipped"})
        );
    }
}

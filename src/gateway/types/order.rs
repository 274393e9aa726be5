//! Order request types
//!
//! - `OrderPayload`: Axum extractor for the POST /order body
//! - `StatusQuery`: `?status=` parameter of the status endpoint

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::response::ApiError;
use crate::orders::NewOrder;

/// Order body extractor.
///
/// Every way the body can be malformed (bad JSON, missing or mistyped
/// fields, wrong content type) is answered with 422.
#[derive(Debug)]
pub struct OrderPayload(pub NewOrder);

impl<S> FromRequest<S> for OrderPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(order) = Json::<NewOrder>::from_request(req, state)
            .await
            .map_err(|e| ApiError::unprocessable(format!("Invalid order body: {}", e.body_text())))?;
        Ok(OrderPayload(order))
    }
}

/// Status update parameter
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// pending | preparing | completed | cancelled
    #[param(example = "preparing")]
    pub status: String,
}

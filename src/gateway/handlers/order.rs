//! Order handlers (place, list, get, status, reprint)

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, MessageData, OrderCreatedData, OrderPayload, StatusQuery,
};
use crate::orders::Order;

/// A non-integer id is a malformed request, answered like a bad body
fn order_id_from_path(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    let Path(order_id) = path.map_err(|e| ApiError::unprocessable(e.body_text()))?;
    Ok(order_id)
}

/// Place an order
///
/// POST /order
#[utoipa::path(
    post,
    path = "/order",
    request_body = crate::orders::NewOrder,
    responses(
        (status = 200, description = "Order stored as pending", body = OrderCreatedData),
        (status = 422, description = "Malformed order body")
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    OrderPayload(order): OrderPayload,
) -> ApiResult<OrderCreatedData> {
    tracing::debug!("Create Order: {:?}", order);
    let order_id = state.orders.place_order(order).await?;

    Ok(Json(OrderCreatedData {
        message: "Order created".to_string(),
        order_id,
    }))
}

/// List all orders, newest first
///
/// GET /orders
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders, newest first", body = Vec<Order>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Order>> {
    Ok(Json(state.orders.list_orders().await?))
}

/// Fetch one order
///
/// GET /orders/{order_id}
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(("order_id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Order id is not an integer")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    order_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Order> {
    let order_id = order_id_from_path(order_id)?;
    Ok(Json(state.orders.get_order(order_id).await?))
}

/// Set order status
///
/// POST /orders/{order_id}/status?status=<status>
///
/// Any status may follow any other. An unknown order id is acknowledged
/// without changing anything.
#[utoipa::path(
    post,
    path = "/orders/{order_id}/status",
    params(("order_id" = i64, Path, description = "Order id"), StatusQuery),
    responses(
        (status = 200, description = "Status written", body = MessageData),
        (status = 400, description = "Status outside pending|preparing|completed|cancelled"),
        (status = 422, description = "Missing status parameter or non-integer order id")
    ),
    tag = "Orders"
)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    order_id: Result<Path<i64>, PathRejection>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> ApiResult<MessageData> {
    let order_id = order_id_from_path(order_id)?;
    let Query(query) = query.map_err(|e| ApiError::unprocessable(e.body_text()))?;
    let status = state.orders.set_status(order_id, &query.status).await?;

    Ok(Json(MessageData::new(format!(
        "Order #{} status updated to {}",
        order_id, status
    ))))
}

/// Print the receipt again
///
/// POST /orders/{order_id}/print
#[utoipa::path(
    post,
    path = "/orders/{order_id}/print",
    params(("order_id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Receipt queued", body = MessageData),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Order id is not an integer")
    ),
    tag = "Orders"
)]
pub async fn print_order(
    State(state): State<Arc<AppState>>,
    order_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<MessageData> {
    let order_id = order_id_from_path(order_id)?;
    state.orders.reprint(order_id).await?;
    Ok(Json(MessageData::new(format!(
        "Order #{} sent to printer",
        order_id
    ))))
}

//! OpenAPI documentation
//!
//! - OpenAPI JSON: `http://localhost:8000/api-docs/openapi.json`

use axum::Json;
use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{MessageData, OrderCreatedData};
use crate::orders::{NewOrder, Order, OrderItem, OrderStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Café Orders API",
        version = "1.0.0",
        description = "Order intake, status tracking and receipt printing for the front-of-house dashboard.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::create_order,
        crate::gateway::handlers::list_orders,
        crate::gateway::handlers::get_order,
        crate::gateway::handlers::update_status,
        crate::gateway::handlers::print_order,
    ),
    components(
        schemas(
            HealthResponse,
            NewOrder,
            Order,
            OrderItem,
            OrderStatus,
            OrderCreatedData,
            MessageData,
        )
    ),
    tags(
        (name = "Orders", description = "Order lifecycle"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

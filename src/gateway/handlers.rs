//! HTTP handlers
//!
//! Thin adapters: extract, call the order service, shape the response.

pub mod health;
pub mod helpers;
pub mod order;

pub use health::{HealthResponse, health_check};
pub use order::{create_order, get_order, list_orders, print_order, update_status};

// utoipa generates one path struct per handler next to the function;
// re-export them so `openapi.rs` can name `handlers::<fn>` directly.
pub use health::__path_health_check;
pub use order::{
    __path_create_order, __path_get_order, __path_list_orders, __path_print_order,
    __path_update_status,
};

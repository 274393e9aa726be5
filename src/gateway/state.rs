use std::sync::Arc;

use crate::db::Database;
use crate::orders::OrderService;

/// Gateway application state (shared)
pub struct AppState {
    /// Order lifecycle
    pub orders: Arc<OrderService>,
    /// Database (health checks)
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(orders: Arc<OrderService>, db: Arc<Database>) -> Self {
        Self { orders, db }
    }
}

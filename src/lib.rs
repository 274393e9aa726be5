//! Café Orders - order backend for a single café
//!
//! Takes orders from the counter and tables, stores them, tells the partners
//! by mail, prints a receipt and serves order state to the dashboard.
//!
//! # Modules
//!
//! - [`orders`] - Order model, store (SQLite) and lifecycle service
//! - [`notify`] - Side-effect collaborators (partner mail, HTML receipt)
//! - [`gateway`] - HTTP API (axum)
//! - [`db`] - Connection pool and schema
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod notify;
pub mod orders;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use db::Database;
pub use orders::{NewOrder, Order, OrderError, OrderItem, OrderService, OrderStatus, OrderStore};

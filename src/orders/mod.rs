//! Order lifecycle and persistence

pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use error::OrderError;
pub use models::{DEFAULT_CUSTOMER, NewOrder, Order, OrderItem, OrderStatus, now_minute};
pub use service::OrderService;
pub use store::OrderStore;

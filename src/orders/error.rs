use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Order not found: {0}")]
    NotFound(i64),

    /// Status string outside pending | preparing | completed | cancelled
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Order {id} has unreadable stored data: {reason}")]
    Corrupt { id: i64, reason: String },
}

//! Order side effects
//!
//! Collaborators invoked after an order is stored. Both are best effort:
//! the order service logs their errors and never hands them to the caller.
//!
//! - [`Notifier`]: tell the partners about a new order ([`MailNotifier`], [`LogNotifier`])
//! - [`ReceiptPrinter`]: produce a printable receipt ([`HtmlReceiptPrinter`])

pub mod mail;
pub mod receipt;

pub use mail::{LogNotifier, MailNotifier, compose_summary};
pub use receipt::HtmlReceiptPrinter;

use async_trait::async_trait;
use thiserror::Error;

use crate::orders::NewOrder;

#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("No mail recipients configured")]
    NoRecipients,

    #[error("Failed to build mail: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Delivers a human-readable order summary to the partners
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Name for logging
    fn name(&self) -> &'static str;

    async fn notify(&self, order_id: i64, order: &NewOrder) -> Result<(), CollaboratorError>;
}

/// Renders a receipt and makes it available for printing
#[async_trait]
pub trait ReceiptPrinter: Send + Sync {
    /// Name for logging
    fn name(&self) -> &'static str;

    async fn print(&self, order_id: i64, order: &NewOrder) -> Result<(), CollaboratorError>;
}

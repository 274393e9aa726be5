//! Order data model
//!
//! - `NewOrder`: order payload as placed by staff/customers (HTTP body, collaborator input)
//! - `Order`: persisted order as returned to the dashboard
//! - `OrderItem`: one line of an order
//! - `OrderStatus`: lifecycle status, freely settable

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::OrderError;

/// Customer name used when the order does not carry one
pub const DEFAULT_CUSTOMER: &str = "Guest";

/// Server timestamp format (minute precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Current local time as `YYYY-MM-DD HH:MM`
pub fn now_minute() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Order lifecycle status.
///
/// New orders start as `Pending`. Any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    /// Exact, case-sensitive match on the wire names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| OrderError::InvalidStatus(s.to_string()))
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    #[schema(example = "Latte")]
    pub name: String,
    #[schema(example = "M")]
    pub size: String,
    #[schema(example = 2)]
    pub qty: u32,
    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 4.5)]
    pub price: Decimal,
}

impl OrderItem {
    /// `price * qty`, `None` on overflow
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.qty))
    }
}

/// Order payload as placed by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewOrder {
    /// Absent, null or blank means "Guest"
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub takeaway: bool,
    pub items: Vec<OrderItem>,
    /// Computed by the client
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 9.0)]
    pub total: Decimal,
}

impl NewOrder {
    /// Customer name with the "Guest" default applied
    pub fn customer_name(&self) -> &str {
        match self.customer_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_CUSTOMER,
        }
    }

    /// Apply defaults so the stored payload is the one collaborators see
    pub fn normalized(mut self) -> Self {
        self.customer_name = Some(self.customer_name().to_string());
        self
    }

    /// Sum of `qty * price` over all items, `None` if it does not fit a `Decimal`
    pub fn items_subtotal(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
    }

    /// Checks the constraints the field types promise: positive quantities,
    /// non-negative prices and total. The total is not cross-checked here.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.total < Decimal::ZERO {
            return Err(OrderError::InvalidOrder(format!(
                "total must not be negative (got {})",
                self.total
            )));
        }
        for (idx, item) in self.items.iter().enumerate() {
            if item.qty == 0 {
                return Err(OrderError::InvalidOrder(format!(
                    "item {} ({}): qty must be positive",
                    idx, item.name
                )));
            }
            if item.price < Decimal::ZERO {
                return Err(OrderError::InvalidOrder(format!(
                    "item {} ({}): price must not be negative",
                    idx, item.name
                )));
            }
        }
        Ok(())
    }
}

/// Persisted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Guest")]
    pub customer_name: String,
    pub table_number: Option<String>,
    pub takeaway: bool,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 9.0)]
    pub total: Decimal,
    pub status: OrderStatus,
    /// `YYYY-MM-DD HH:MM`, set once at creation
    #[schema(example = "2026-10-18 09:30")]
    pub created_at: String,
}

impl Order {
    /// Rebuild the payload this order was placed with
    pub fn to_payload(&self) -> NewOrder {
        NewOrder {
            customer_name: Some(self.customer_name.clone()),
            table_number: self.table_number.clone(),
            takeaway: self.takeaway,
            items: self.items.clone(),
            total: self.total,
        }
    }
}

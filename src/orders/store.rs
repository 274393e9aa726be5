//! Order Store
//!
//! SQLite persistence for orders. The only reader/writer of the `orders` table.
//! Items are kept as a JSON blob, totals as decimal strings.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::error::OrderError;
use super::models::{NewOrder, Order, OrderItem, OrderStatus, now_minute};

const SELECT_ORDER: &str = r#"
    SELECT id, customer_name, table_number, takeaway, items, total, status, created_at
    FROM orders"#;

/// Order database operations
#[derive(Clone)]
pub struct OrderStore {
    pool: SqlitePool,
}

impl OrderStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new order as `pending`, stamped with the current minute.
    ///
    /// The total is stored exactly as supplied.
    pub async fn create(&self, order: &NewOrder) -> Result<i64, OrderError> {
        let items = serde_json::to_string(&order.items)
            .map_err(|e| OrderError::InvalidOrder(format!("items not serializable: {}", e)))?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO orders
                (customer_name, table_number, takeaway, items, total, status, created_at)
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(order.customer_name())
        .bind(order.table_number.as_deref())
        .bind(order.takeaway)
        .bind(items)
        .bind(order.total.to_string())
        .bind(OrderStatus::Pending.as_str())
        .bind(now_minute())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// All orders, newest first
    pub async fn list(&self) -> Result<Vec<Order>, OrderError> {
        let rows = sqlx::query(&format!("{} ORDER BY id DESC", SELECT_ORDER))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(order_from_row).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Order, OrderError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_ORDER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        order_from_row(&row)
    }

    /// Overwrite the status. No transition rules apply.
    ///
    /// An id that matches no row is not an error; nothing is written.
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> Result<(), OrderError> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(
                order_id = id,
                status = %status,
                "Status update matched no order"
            );
        }
        Ok(())
    }
}

fn order_from_row(row: &SqliteRow) -> Result<Order, OrderError> {
    let id: i64 = row.try_get("id")?;
    let corrupt = |reason: String| OrderError::Corrupt { id, reason };

    let items_json: String = row.try_get("items")?;
    let items: Vec<OrderItem> =
        serde_json::from_str(&items_json).map_err(|e| corrupt(format!("items: {}", e)))?;

    let total_str: String = row.try_get("total")?;
    let total = Decimal::from_str(&total_str)
        .map_err(|e| corrupt(format!("total '{}': {}", total_str, e)))?;

    let status_str: String = row.try_get("status")?;
    let status = status_str
        .parse::<OrderStatus>()
        .map_err(|_| corrupt(format!("status '{}'", status_str)))?;

    let takeaway: i64 = row.try_get("takeaway")?;

    Ok(Order {
        id,
        customer_name: row.try_get("customer_name")?,
        table_number: row.try_get("table_number")?,
        takeaway: takeaway != 0,
        items,
        total,
        status,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(name: &str, size: &str, qty: u32, price: &str) -> OrderItem {
        OrderItem {
            name: name.to_string(),
            size: size.to_string(),
            qty,
            price: d(price),
        }
    }

    fn new_order(items: Vec<OrderItem>, total: &str) -> NewOrder {
        NewOrder {
            customer_name: None,
            table_number: None,
            takeaway: false,
            items,
            total: d(total),
        }
    }

    async fn store() -> (Database, OrderStore) {
        let db = Database::in_memory().await.unwrap();
        let store = OrderStore::new(db.pool().clone());
        (db, store)
    }

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let (_db, store) = store().await;
        let items = vec![
            item("Latte", "M", 2, "4.5"),
            item("Espresso", "S", 1, "2.75"),
            item("Brownie", "-", 3, "3"),
        ];
        let mut order = new_order(items.clone(), "20.75");
        order.customer_name = Some("Omar".to_string());
        order.table_number = Some("5".to_string());

        let id = store.create(&order).await.unwrap();
        let fetched = store.get(id).await.unwrap();

        assert_eq!(fetched.id, id);
        assert_eq!(fetched.customer_name, "Omar");
        assert_eq!(fetched.table_number.as_deref(), Some("5"));
        assert!(!fetched.takeaway);
        assert_eq!(fetched.items, items, "items keep their original order");
        assert_eq!(fetched.total, d("20.75"));
        assert_eq!(fetched.status, OrderStatus::Pending);
        assert_eq!(fetched.created_at.len(), "YYYY-MM-DD HH:MM".len());
    }

    #[tokio::test]
    async fn test_create_defaults_customer_and_keeps_takeaway() {
        let (_db, store) = store().await;
        let mut order = new_order(vec![item("Mocha", "L", 1, "5")], "5");
        order.takeaway = true;

        let id = store.create(&order).await.unwrap();
        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.customer_name, "Guest");
        assert!(fetched.takeaway);
        assert_eq!(fetched.table_number, None);
    }

    #[tokio::test]
    async fn test_total_is_stored_as_supplied() {
        let (_db, store) = store().await;
        // 2 x 4.5 = 9, but the store trusts the caller
        let order = new_order(vec![item("Latte", "M", 2, "4.5")], "1.23");
        let id = store.create(&order).await.unwrap();
        assert_eq!(store.get(id).await.unwrap().total, d("1.23"));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_db, store) = store().await;
        for _ in 0..3 {
            store
                .create(&new_order(vec![item("Tea", "M", 1, "2")], "2"))
                .await
                .unwrap();
        }

        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (_db, store) = store().await;
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_db, store) = store().await;
        assert!(matches!(store.get(42).await, Err(OrderError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_update_status_any_to_any() {
        let (_db, store) = store().await;
        let id = store
            .create(&new_order(vec![item("Tea", "M", 1, "2")], "2"))
            .await
            .unwrap();

        // cancelled -> pending is allowed as well
        for status in [
            OrderStatus::Cancelled,
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Preparing,
        ] {
            store.update_status(id, status).await.unwrap();
            assert_eq!(store.get(id).await.unwrap().status, status);
        }
    }

    #[tokio::test]
    async fn test_update_status_does_not_touch_other_fields() {
        let (_db, store) = store().await;
        let id = store
            .create(&new_order(vec![item("Tea", "M", 1, "2")], "2"))
            .await
            .unwrap();
        let before = store.get(id).await.unwrap();

        store.update_status(id, OrderStatus::Completed).await.unwrap();
        let after = store.get(id).await.unwrap();
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.items, before.items);
        assert_eq!(after.total, before.total);
    }

    #[tokio::test]
    async fn test_update_status_missing_id_is_noop() {
        let (_db, store) = store().await;
        store
            .create(&new_order(vec![item("Tea", "M", 1, "2")], "2"))
            .await
            .unwrap();

        store.update_status(99, OrderStatus::Completed).await.unwrap();

        let orders = store.list().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Pending);
        assert!(matches!(store.get(99).await, Err(OrderError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_ids_not_reused() {
        let (db, store) = store().await;
        let first = store
            .create(&new_order(vec![item("Tea", "M", 1, "2")], "2"))
            .await
            .unwrap();
        sqlx::query("DELETE FROM orders")
            .execute(db.pool())
            .await
            .unwrap();

        let second = store
            .create(&new_order(vec![item("Tea", "M", 1, "2")], "2"))
            .await
            .unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let (db, store) = store().await;
        let id = store
            .create(&new_order(vec![item("Tea", "M", 1, "2")], "2"))
            .await
            .unwrap();
        sqlx::query("UPDATE orders SET status = 'shipped' WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await
            .unwrap();

        match store.get(id).await {
            Err(OrderError::Corrupt { id: bad, reason }) => {
                assert_eq!(bad, id);
                assert!(reason.contains("shipped"));
            }
            other => panic!("expected Corrupt, got {:?}", other),
        }
    }
}

//! Order Service - order lifecycle
//!
//! Validates and normalizes incoming orders, persists them through the
//! [`OrderStore`], then dispatches the side effects (partner notification,
//! receipt) as background tasks. Side effects never change the outcome of the
//! operation that triggered them; [`OrderService::drain_side_effects`] lets
//! shutdown wait for the ones still running.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinSet;

use super::error::OrderError;
use super::models::{NewOrder, Order, OrderStatus};
use super::store::OrderStore;
use crate::notify::{Notifier, ReceiptPrinter};

pub struct OrderService {
    store: OrderStore,
    notifier: Option<Arc<dyn Notifier>>,
    printer: Option<Arc<dyn ReceiptPrinter>>,
    enforce_total: bool,
    tasks: Mutex<JoinSet<()>>,
}

impl OrderService {
    /// Service with no collaborators and the client total trusted
    pub fn new(store: OrderStore) -> Self {
        Self {
            store,
            notifier: None,
            printer: None,
            enforce_total: false,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_printer(mut self, printer: Arc<dyn ReceiptPrinter>) -> Self {
        self.printer = Some(printer);
        self
    }

    /// Reject orders whose total differs from the item sum
    pub fn with_enforce_total(mut self, enforce_total: bool) -> Self {
        self.enforce_total = enforce_total;
        self
    }

    /// Store a new order as `pending`, then notify partners and print the receipt.
    pub async fn place_order(&self, input: NewOrder) -> Result<i64, OrderError> {
        let order = input.normalized();
        order.validate()?;
        self.check_total(&order)?;
        if order.items.is_empty() {
            tracing::warn!(
                "[ORDER] Order for {} has no items, storing anyway",
                order.customer_name()
            );
        }

        let order_id = self.store.create(&order).await?;
        tracing::info!(
            order_id,
            customer = order.customer_name(),
            items = order.items.len(),
            total = %order.total,
            "[ORDER] Created"
        );

        let order = Arc::new(order);
        self.dispatch_notification(order_id, order.clone());
        self.dispatch_receipt(order_id, order);

        Ok(order_id)
    }

    /// All orders, newest first
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.store.list().await
    }

    pub async fn get_order(&self, order_id: i64) -> Result<Order, OrderError> {
        self.store.get(order_id).await
    }

    /// Set any status from any status.
    ///
    /// Unknown status strings are rejected before the store is touched.
    /// An unknown order id is accepted and changes nothing.
    pub async fn set_status(&self, order_id: i64, status: &str) -> Result<OrderStatus, OrderError> {
        let status: OrderStatus = status.parse()?;
        self.store.update_status(order_id, status).await?;
        tracing::info!("[ORDER] Order #{} status -> {}", order_id, status);
        Ok(status)
    }

    /// Print the receipt of an existing order again. Status is left as is.
    pub async fn reprint(&self, order_id: i64) -> Result<(), OrderError> {
        let order = self.store.get(order_id).await?;
        if self.printer.is_none() {
            tracing::warn!(
                "[RECEIPT] Reprint of order #{} requested but receipts are disabled",
                order_id
            );
        }
        self.dispatch_receipt(order_id, Arc::new(order.to_payload()));
        Ok(())
    }

    fn check_total(&self, order: &NewOrder) -> Result<(), OrderError> {
        let Some(subtotal) = order.items_subtotal() else {
            if self.enforce_total {
                return Err(OrderError::InvalidOrder(
                    "item sum is too large to check against total".to_string(),
                ));
            }
            tracing::warn!(
                "[ORDER] Item sum overflows, keeping client total {}",
                order.total
            );
            return Ok(());
        };
        if subtotal == order.total {
            return Ok(());
        }
        if self.enforce_total {
            return Err(OrderError::InvalidOrder(format!(
                "total {} does not match item sum {}",
                order.total, subtotal
            )));
        }
        tracing::warn!(
            "[ORDER] Client total {} differs from item sum {}, keeping client total",
            order.total,
            subtotal
        );
        Ok(())
    }

    /// Track a side-effect task, reaping the ones already finished
    fn spawn_side_effect<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while tasks.try_join_next().is_some() {}
        tasks.spawn(task);
    }

    /// Wait for in-flight notifications and receipts, up to `timeout`.
    ///
    /// Returns the number of tasks abandoned when the timeout elapsed.
    pub async fn drain_side_effects(&self, timeout: Duration) -> usize {
        let mut tasks = {
            let mut guard = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };
        if tasks.is_empty() {
            return 0;
        }
        tracing::info!("[ORDER] Waiting for {} side effect(s) to finish", tasks.len());

        let drained = tokio::time::timeout(timeout, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;

        match drained {
            Ok(()) => 0,
            Err(_) => {
                let abandoned = tasks.len();
                tracing::warn!(
                    "[ORDER] {} side effect(s) still running after {:?}, dropping them",
                    abandoned,
                    timeout
                );
                tasks.abort_all();
                abandoned
            }
        }
    }

    fn dispatch_notification(&self, order_id: i64, order: Arc<NewOrder>) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        self.spawn_side_effect(async move {
            if let Err(e) = notifier.notify(order_id, &order).await {
                tracing::error!(
                    "[NOTIFY] {} failed for order #{}: {}",
                    notifier.name(),
                    order_id,
                    e
                );
            }
        });
    }

    fn dispatch_receipt(&self, order_id: i64, order: Arc<NewOrder>) {
        let Some(printer) = self.printer.clone() else {
            return;
        };
        self.spawn_side_effect(async move {
            if let Err(e) = printer.print(order_id, &order).await {
                tracing::error!(
                    "[RECEIPT] {} failed for order #{}: {}",
                    printer.name(),
                    order_id,
                    e
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::notify::mock::RecordingCollaborator;
    use crate::orders::OrderItem;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn latte_order(total: &str) -> NewOrder {
        NewOrder {
            customer_name: None,
            table_number: Some("2".to_string()),
            takeaway: false,
            items: vec![OrderItem {
                name: "Latte".to_string(),
                size: "M".to_string(),
                qty: 2,
                price: "4.5".parse().unwrap(),
            }],
            total: total.parse().unwrap(),
        }
    }

    async fn next_call(rx: &mut UnboundedReceiver<(i64, NewOrder)>) -> (i64, NewOrder) {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("collaborator was not called")
            .expect("channel closed")
    }

    async fn service() -> (Database, OrderService) {
        let db = Database::in_memory().await.unwrap();
        let service = OrderService::new(OrderStore::new(db.pool().clone()));
        (db, service)
    }

    #[tokio::test]
    async fn test_place_order_stores_pending_and_dispatches_both() {
        let (_db, service) = service().await;
        let (notifier, mut notified) = RecordingCollaborator::new(false);
        let (printer, mut printed) = RecordingCollaborator::new(false);
        let service = service.with_notifier(notifier).with_printer(printer);

        let id = service.place_order(latte_order("9.0")).await.unwrap();
        assert_eq!(id, 1);

        let order = service.get_order(id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer_name, "Guest");

        let (notified_id, payload) = next_call(&mut notified).await;
        assert_eq!(notified_id, id);
        assert_eq!(payload.customer_name.as_deref(), Some("Guest"));
        assert_eq!(payload.items.len(), 1);

        let (printed_id, _) = next_call(&mut printed).await;
        assert_eq!(printed_id, id);
    }

    #[tokio::test]
    async fn test_collaborator_failures_do_not_fail_order() {
        let (_db, service) = service().await;
        let (notifier, mut notified) = RecordingCollaborator::new(true);
        let (printer, mut printed) = RecordingCollaborator::new(true);
        let service = service.with_notifier(notifier).with_printer(printer);

        let id = service.place_order(latte_order("9")).await.unwrap();
        next_call(&mut notified).await;
        next_call(&mut printed).await;

        // order is still there and untouched
        let orders = service.list_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, id);
        assert_eq!(orders[0].status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_one_failing_collaborator_does_not_stop_the_other() {
        let (_db, service) = service().await;
        let (notifier, mut notified) = RecordingCollaborator::new(true);
        let (printer, mut printed) = RecordingCollaborator::new(false);
        let service = service.with_notifier(notifier).with_printer(printer);

        let id = service.place_order(latte_order("9")).await.unwrap();
        assert_eq!(next_call(&mut notified).await.0, id);
        assert_eq!(next_call(&mut printed).await.0, id);
    }

    #[tokio::test]
    async fn test_invalid_order_is_not_stored_or_dispatched() {
        let (_db, service) = service().await;
        let (notifier, mut notified) = RecordingCollaborator::new(false);
        let service = service.with_notifier(notifier);

        let mut order = latte_order("9");
        order.items[0].qty = 0;
        assert!(matches!(
            service.place_order(order).await,
            Err(OrderError::InvalidOrder(_))
        ));
        assert!(service.list_orders().await.unwrap().is_empty());
        assert!(notified.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_total_mismatch_trusted_by_default() {
        let (_db, service) = service().await;
        let id = service.place_order(latte_order("5")).await.unwrap();
        assert_eq!(
            service.get_order(id).await.unwrap().total,
            "5".parse().unwrap()
        );
    }

    #[tokio::test]
    async fn test_total_mismatch_rejected_when_enforced() {
        let (_db, service) = service().await;
        let service = service.with_enforce_total(true);

        assert!(matches!(
            service.place_order(latte_order("5")).await,
            Err(OrderError::InvalidOrder(msg)) if msg.contains("does not match")
        ));
        assert!(service.list_orders().await.unwrap().is_empty());

        // 9.0 and 9 are the same amount
        assert!(service.place_order(latte_order("9.00")).await.is_ok());
    }

    fn gold_bar_order() -> NewOrder {
        serde_json::from_str(
            r#"{"items":[{"name":"Gold","size":"L","qty":10,"price":1e28}],"total":1.0}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_item_sum_overflow_stored_when_total_trusted() {
        let (_db, service) = service().await;
        let id = service.place_order(gold_bar_order()).await.unwrap();

        let stored = service.get_order(id).await.unwrap();
        assert_eq!(stored.total, "1".parse().unwrap());
        assert_eq!(stored.items[0].qty, 10);
    }

    #[tokio::test]
    async fn test_item_sum_overflow_rejected_when_enforced() {
        let (_db, service) = service().await;
        let service = service.with_enforce_total(true);

        assert!(matches!(
            service.place_order(gold_bar_order()).await,
            Err(OrderError::InvalidOrder(msg)) if msg.contains("too large")
        ));
        assert!(service.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drain_waits_for_side_effects() {
        let (_db, service) = service().await;
        let (notifier, mut notified) = RecordingCollaborator::new(false);
        let (printer, mut printed) = RecordingCollaborator::new(false);
        let service = service.with_notifier(notifier).with_printer(printer);

        let id = service.place_order(latte_order("9")).await.unwrap();
        assert_eq!(service.drain_side_effects(Duration::from_secs(2)).await, 0);

        // Both tasks have finished, so their calls are already queued
        assert_eq!(notified.try_recv().unwrap().0, id);
        assert_eq!(printed.try_recv().unwrap().0, id);
        assert_eq!(service.drain_side_effects(Duration::from_secs(2)).await, 0);
    }

    #[tokio::test]
    async fn test_empty_items_accepted() {
        let (_db, service) = service().await;
        let mut order = latte_order("0");
        order.items.clear();
        let id = service.place_order(order).await.unwrap();
        assert!(service.get_order(id).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_set_status_each_valid_value() {
        let (_db, service) = service().await;
        let id = service.place_order(latte_order("9")).await.unwrap();

        for status in ["preparing", "completed", "cancelled", "pending"] {
            let set = service.set_status(id, status).await.unwrap();
            assert_eq!(set.as_str(), status);
            assert_eq!(service.get_order(id).await.unwrap().status, set);
        }
    }

    #[tokio::test]
    async fn test_set_status_invalid_leaves_order_unchanged() {
        let (_db, service) = service().await;
        let id = service.place_order(latte_order("9")).await.unwrap();
        service.set_status(id, "preparing").await.unwrap();

        for bad in ["shipped", "PENDING", "", "done "] {
            assert!(matches!(
                service.set_status(id, bad).await,
                Err(OrderError::InvalidStatus(_))
            ));
        }
        assert_eq!(
            service.get_order(id).await.unwrap().status,
            OrderStatus::Preparing
        );
    }

    #[tokio::test]
    async fn test_set_status_unknown_id_is_noop() {
        let (_db, service) = service().await;
        service.place_order(latte_order("9")).await.unwrap();

        assert!(service.set_status(404, "completed").await.is_ok());
        let orders = service.list_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_reprint_missing_is_not_found() {
        let (_db, service) = service().await;
        let (printer, mut printed) = RecordingCollaborator::new(false);
        let service = service.with_printer(printer);

        assert!(matches!(
            service.reprint(7).await,
            Err(OrderError::NotFound(7))
        ));
        assert!(printed.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reprint_any_status() {
        let (_db, service) = service().await;
        let (printer, mut printed) = RecordingCollaborator::new(false);
        let service = service.with_printer(printer);

        let mut order = latte_order("9");
        order.customer_name = Some("Nour".to_string());
        let id = service.place_order(order).await.unwrap();
        next_call(&mut printed).await;

        service.set_status(id, "cancelled").await.unwrap();
        service.reprint(id).await.unwrap();

        let (reprinted_id, payload) = next_call(&mut printed).await;
        assert_eq!(reprinted_id, id);
        assert_eq!(payload.customer_name(), "Nour");
        assert_eq!(payload.table_number.as_deref(), Some("2"));
        assert_eq!(payload.total, "9".parse().unwrap());

        // no new record, status kept
        let orders = service.list_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_reprint_failure_is_swallowed() {
        let (_db, service) = service().await;
        let (printer, mut printed) = RecordingCollaborator::new(true);
        let service = service.with_printer(printer);

        let id = service.place_order(latte_order("9")).await.unwrap();
        next_call(&mut printed).await;
        assert!(service.reprint(id).await.is_ok());
        next_call(&mut printed).await;
    }

    #[tokio::test]
    async fn test_reprint_without_printer_still_ok() {
        let (_db, service) = service().await;
        let id = service.place_order(latte_order("9")).await.unwrap();
        assert!(service.reprint(id).await.is_ok());
    }
}

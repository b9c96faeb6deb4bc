//! Live order list for the kitchen board and customer display
//!
//! Subscribes to the store's change channel and keeps a sorted snapshot
//! (newest first) in a `watch` channel. A subscriber that lags behind the
//! broadcast buffer reloads the full list from the store.

use super::board::{CustomerDisplay, KitchenBoard};
use super::store::{OrderStore, sort_newest_first};
use crate::db::StorageResult;
use shared::order::{Order, OrderChange};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

pub type OrderSnapshot = Arc<Vec<Order>>;

pub struct OrderFeed {
    rx: watch::Receiver<OrderSnapshot>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for OrderFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderFeed")
            .field("orders", &self.rx.borrow().len())
            .finish()
    }
}

/// Fold one change into the list
fn apply_change(orders: &mut Vec<Order>, change: OrderChange) {
    match change {
        OrderChange::Created { order } | OrderChange::Updated { order } => {
            match orders.iter_mut().find(|o| o.id == order.id) {
                Some(existing) => *existing = order,
                None => orders.push(order),
            }
            sort_newest_first(orders);
        }
        OrderChange::Deleted { order_id } => orders.retain(|o| o.id != order_id),
    }
}

async fn run(
    store: Arc<dyn OrderStore>,
    mut changes: broadcast::Receiver<OrderChange>,
    tx: watch::Sender<OrderSnapshot>,
) {
    loop {
        match changes.recv().await {
            Ok(change) => {
                let mut orders = tx.borrow().as_ref().clone();
                apply_change(&mut orders, change);
                tx.send_replace(Arc::new(orders));
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Order feed lagged, reloading");
                match store.list().await {
                    Ok(orders) => {
                        tx.send_replace(Arc::new(orders));
                    }
                    Err(e) => tracing::error!(error = %e, "Order feed reload failed"),
                }
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::debug!("Order store closed, feed stopping");
                break;
            }
        }
    }
}

impl OrderFeed {
    /// Load the current list and start following changes
    pub async fn start(store: Arc<dyn OrderStore>) -> StorageResult<Self> {
        // Subscribe first so nothing committed during the initial load is missed
        let changes = store.subscribe();
        let initial = store.list().await?;
        tracing::debug!(orders = initial.len(), "Order feed started");

        let (tx, rx) = watch::channel(Arc::new(initial));
        let task = tokio::spawn(run(store, changes, tx));
        Ok(Self { rx, task })
    }

    /// Subscribe-all: receives the full sorted list after every change
    pub fn subscribe(&self) -> watch::Receiver<OrderSnapshot> {
        self.rx.clone()
    }

    pub fn snapshot(&self) -> OrderSnapshot {
        self.rx.borrow().clone()
    }

    pub fn board(&self) -> KitchenBoard {
        KitchenBoard::from_orders(&self.snapshot())
    }

    pub fn customer_display(&self) -> CustomerDisplay {
        CustomerDisplay::from_orders(&self.snapshot())
    }
}

impl Drop for OrderFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

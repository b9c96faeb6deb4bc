//! In-memory order store (DashMap)
//!
//! Writes take `write_lock` for the mutation and its notification, so
//! subscribers receive changes in the order they were applied.

use super::store::{CHANGE_CHANNEL_CAPACITY, OrderStore, OrderUpdate, sort_newest_first};
use crate::db::StorageResult;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use shared::order::{Order, OrderChange, OrderPatch};
use shared::util::new_record_id;
use tokio::sync::broadcast;

pub struct MemoryOrderStore {
    orders: DashMap<String, Order>,
    tx: broadcast::Sender<OrderChange>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for MemoryOrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryOrderStore")
            .field("orders", &self.orders.len())
            .finish()
    }
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            orders: DashMap::new(),
            tx,
            write_lock: Mutex::new(()),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Apply one mutation and publish its change before the next writer runs
    fn write<T>(&self, f: impl FnOnce(&DashMap<String, Order>) -> (T, Option<OrderChange>)) -> T {
        let _guard = self.write_lock.lock();
        let (result, change) = f(&self.orders);
        if let Some(change) = change {
            // No subscribers is fine
            let _ = self.tx.send(change);
        }
        result
    }
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn create(&self, mut order: Order) -> StorageResult<String> {
        tokio::task::yield_now().await;
        order.id = new_record_id();
        Ok(self.write(|orders| {
            let id = order.id.clone();
            orders.insert(id.clone(), order.clone());
            (id, Some(OrderChange::Created { order }))
        }))
    }

    async fn get(&self, order_id: &str) -> StorageResult<Option<Order>> {
        tokio::task::yield_now().await;
        Ok(self.orders.get(order_id).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> StorageResult<Vec<Order>> {
        tokio::task::yield_now().await;
        let mut orders: Vec<Order> = self.orders.iter().map(|entry| entry.value().clone()).collect();
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    async fn put(&self, order: Order) -> StorageResult<()> {
        tokio::task::yield_now().await;
        self.write(|orders| {
            let existed = orders.insert(order.id.clone(), order.clone()).is_some();
            let change = if existed {
                OrderChange::Updated { order }
            } else {
                OrderChange::Created { order }
            };
            ((), Some(change))
        });
        Ok(())
    }

    async fn replace(&self, order_id: &str, update: OrderUpdate) -> StorageResult<Option<(Order, Order)>> {
        tokio::task::yield_now().await;
        Ok(self.write(|orders| match orders.entry(order_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let mut next = update(entry.get());
                next.id = order_id.to_string();
                let previous = entry.insert(next.clone());
                (
                    Some((previous, next.clone())),
                    Some(OrderChange::Updated { order: next }),
                )
            }
            Entry::Vacant(_) => (None, None),
        }))
    }

    async fn patch(&self, order_id: &str, patch: OrderPatch) -> StorageResult<Option<Order>> {
        tokio::task::yield_now().await;
        Ok(self.write(|orders| match orders.get_mut(order_id) {
            Some(mut entry) => {
                entry.apply_patch(&patch);
                let updated = entry.value().clone();
                (
                    Some(updated.clone()),
                    Some(OrderChange::Updated { order: updated }),
                )
            }
            None => (None, None),
        }))
    }

    async fn delete(&self, order_id: &str) -> StorageResult<bool> {
        Ok(self.take(order_id).await?.is_some())
    }

    async fn take(&self, order_id: &str) -> StorageResult<Option<Order>> {
        tokio::task::yield_now().await;
        Ok(self.write(|orders| match orders.remove(order_id) {
            Some((_, order)) => (
                Some(order),
                Some(OrderChange::Deleted {
                    order_id: order_id.to_string(),
                }),
            ),
            None => (None, None),
        }))
    }

    fn subscribe(&self) -> broadcast::Receiver<OrderChange> {
        self.tx.subscribe()
    }
}

//! Order store abstraction
//!
//! One record per order, keyed by a store-assigned id. Writes are
//! last-write-wins except [`OrderStore::replace`], [`OrderStore::patch`] and
//! [`OrderStore::take`], which read and write the record in one atomic step
//! and hand back what they overwrote or removed. The engine relies on those
//! for update, status changes and delete.
//!
//! Change notifications go out in commit order: a subscriber never sees an
//! `Updated` for a record after the `Deleted` that removed it.

use crate::db::StorageResult;
use async_trait::async_trait;
use shared::order::{Order, OrderChange, OrderPatch};
use tokio::sync::broadcast;

/// Change channel capacity (subscribers that fall further behind reload)
pub const CHANGE_CHANNEL_CAPACITY: usize = 1024;

/// Builds the replacement record from the one being overwritten
///
/// Runs inside the store's atomic step; the store keeps the record id.
pub type OrderUpdate = Box<dyn FnOnce(&Order) -> Order + Send>;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new record under a fresh unique id, returning the id
    ///
    /// Any id already on `order` is ignored.
    async fn create(&self, order: Order) -> StorageResult<String>;

    async fn get(&self, order_id: &str) -> StorageResult<Option<Order>>;

    /// All records, newest `created_at` first
    async fn list(&self) -> StorageResult<Vec<Order>>;

    /// Upsert under `order.id`
    async fn put(&self, order: Order) -> StorageResult<()>;

    /// Overwrite an existing record with `update(current)`
    ///
    /// Returns `(replaced, written)`, or `None` (and no write) when the id is
    /// absent.
    async fn replace(&self, order_id: &str, update: OrderUpdate) -> StorageResult<Option<(Order, Order)>>;

    /// Merge a status patch, returning the updated record (`None` if absent)
    async fn patch(&self, order_id: &str, patch: OrderPatch) -> StorageResult<Option<Order>>;

    /// Remove a record; false when it was not there
    async fn delete(&self, order_id: &str) -> StorageResult<bool>;

    /// Remove a record and return it; exactly one concurrent caller gets `Some`
    async fn take(&self, order_id: &str) -> StorageResult<Option<Order>>;

    /// Changes after every committed write
    fn subscribe(&self) -> broadcast::Receiver<OrderChange>;
}

/// Newest first, id as tie-breaker
pub(crate) fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

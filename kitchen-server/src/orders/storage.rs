//! redb-backed order store
//!
//! Records live in the `orders` table as JSON. `replace`, `patch` and `take`
//! read and write inside one write transaction, so the record they return is
//! exactly the one they overwrote or removed. Every write commits and
//! publishes its change while holding `publish_lock`, so subscribers see
//! changes in commit order.

use super::store::{CHANGE_CHANNEL_CAPACITY, OrderStore, OrderUpdate, sort_newest_first};
use crate::db::{KitchenDb, ORDERS_TABLE, StorageResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use redb::{ReadableDatabase, ReadableTable, ReadableTableMetadata, Table};
use shared::order::{Order, OrderChange, OrderPatch};
use shared::util::new_record_id;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct RedbOrderStore {
    db: KitchenDb,
    tx: broadcast::Sender<OrderChange>,
    publish_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for RedbOrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbOrderStore").finish_non_exhaustive()
    }
}

type OrdersTable<'txn> = Table<'txn, &'static str, &'static [u8]>;

fn read_order(table: &OrdersTable<'_>, order_id: &str) -> StorageResult<Option<Order>> {
    match table.get(order_id)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(bytes.value())?)),
        None => Ok(None),
    }
}

fn write_order(table: &mut OrdersTable<'_>, order: &Order) -> StorageResult<()> {
    let value = serde_json::to_vec(order)?;
    table.insert(order.id.as_str(), value.as_slice())?;
    Ok(())
}

impl RedbOrderStore {
    pub fn new(db: KitchenDb) -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            db,
            tx,
            publish_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Number of stored records
    pub async fn count(&self) -> StorageResult<u64> {
        self.db
            .blocking(|db| {
                let read_txn = db.begin_read()?;
                let table = read_txn.open_table(ORDERS_TABLE)?;
                Ok(table.len()?)
            })
            .await
    }

    /// Run one write transaction on the `orders` table
    ///
    /// `f` returns the result and the change to publish; no change means
    /// nothing was written and the transaction is aborted.
    async fn write<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut OrdersTable<'_>) -> StorageResult<(T, Option<OrderChange>)> + Send + 'static,
        T: Send + 'static,
    {
        let tx = self.tx.clone();
        let publish_lock = self.publish_lock.clone();
        self.db
            .blocking(move |db| {
                let _guard = publish_lock.lock();
                let write_txn = db.begin_write()?;
                let (result, change) = {
                    let mut table = write_txn.open_table(ORDERS_TABLE)?;
                    f(&mut table)?
                };
                match change {
                    Some(change) => {
                        write_txn.commit()?;
                        let _ = tx.send(change);
                    }
                    None => write_txn.abort()?,
                }
                Ok(result)
            })
            .await
    }
}

#[async_trait]
impl OrderStore for RedbOrderStore {
    async fn create(&self, mut order: Order) -> StorageResult<String> {
        order.id = new_record_id();
        self.write(move |table| {
            write_order(table, &order)?;
            let id = order.id.clone();
            Ok((id, Some(OrderChange::Created { order })))
        })
        .await
    }

    async fn get(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let order_id = order_id.to_string();
        self.db
            .blocking(move |db| {
                let read_txn = db.begin_read()?;
                let table = read_txn.open_table(ORDERS_TABLE)?;
                match table.get(order_id.as_str())? {
                    Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
                    None => Ok(None),
                }
            })
            .await
    }

    async fn list(&self) -> StorageResult<Vec<Order>> {
        let mut orders = self
            .db
            .blocking(|db| {
                let read_txn = db.begin_read()?;
                let table = read_txn.open_table(ORDERS_TABLE)?;
                let mut orders = Vec::new();
                for entry in table.iter()? {
                    let (_, value) = entry?;
                    orders.push(serde_json::from_slice::<Order>(value.value())?);
                }
                Ok(orders)
            })
            .await?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    async fn put(&self, order: Order) -> StorageResult<()> {
        self.write(move |table| {
            let existed = read_order(table, &order.id)?.is_some();
            write_order(table, &order)?;
            let change = if existed {
                OrderChange::Updated { order }
            } else {
                OrderChange::Created { order }
            };
            Ok(((), Some(change)))
        })
        .await
    }

    async fn replace(&self, order_id: &str, update: OrderUpdate) -> StorageResult<Option<(Order, Order)>> {
        let order_id = order_id.to_string();
        self.write(move |table| {
            let Some(previous) = read_order(table, &order_id)? else {
                return Ok((None, None));
            };
            let mut next = update(&previous);
            next.id = order_id;
            write_order(table, &next)?;
            let change = OrderChange::Updated { order: next.clone() };
            Ok((Some((previous, next)), Some(change)))
        })
        .await
    }

    async fn patch(&self, order_id: &str, patch: OrderPatch) -> StorageResult<Option<Order>> {
        let order_id = order_id.to_string();
        self.write(move |table| {
            let Some(mut order) = read_order(table, &order_id)? else {
                return Ok((None, None));
            };
            order.apply_patch(&patch);
            write_order(table, &order)?;
            let change = OrderChange::Updated { order: order.clone() };
            Ok((Some(order), Some(change)))
        })
        .await
    }

    async fn delete(&self, order_id: &str) -> StorageResult<bool> {
        Ok(self.take(order_id).await?.is_some())
    }

    async fn take(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let order_id = order_id.to_string();
        self.write(move |table| {
            let removed: Option<Order> = match table.remove(order_id.as_str())? {
                Some(bytes) => Some(serde_json::from_slice(bytes.value())?),
                None => None,
            };
            let change = removed.as_ref().map(|_| OrderChange::Deleted { order_id });
            Ok((removed, change))
        })
        .await
    }

    fn subscribe(&self) -> broadcast::Receiver<OrderChange> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::test_support::sample_order;
    use shared::order::OrderStatus;

    fn store() -> RedbOrderStore {
        RedbOrderStore::new(KitchenDb::open_in_memory().unwrap())
    }

    #[tokio::test]
    async fn test_create_get_list() {
        let store = store();
        let a = store.create(sample_order("Budi", 100)).await.unwrap();
        let b = store.create(sample_order("Sari", 200)).await.unwrap();

        assert_eq!(store.get(&a).await.unwrap().unwrap().customer_name, "Budi");
        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![b, a]);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_replace_and_take() {
        let store = store();
        let id = store.create(sample_order("Budi", 1)).await.unwrap();

        let keep_created = Box::new(|current: &Order| Order {
            customer_name: "Andi".to_string(),
            created_at: current.created_at,
            ..sample_order("Andi", 99)
        });
        let (previous, written) = store.replace(&id, keep_created).await.unwrap().unwrap();
        assert_eq!(previous.customer_name, "Budi");
        assert_eq!(written.created_at, 1);
        assert_eq!(written.id, id);
        let missing = Box::new(|current: &Order| current.clone());
        assert!(store.replace("missing", missing).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 1);

        let taken = store.take(&id).await.unwrap().unwrap();
        assert_eq!(taken.customer_name, "Andi");
        assert!(store.take(&id).await.unwrap().is_none());
        assert!(!store.delete(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_patch_persists() {
        let store = store();
        let id = store.create(sample_order("Budi", 1)).await.unwrap();
        let patch = OrderPatch {
            status: Some(OrderStatus::Ready),
            ready_at: Some(7),
            ..Default::default()
        };
        store.patch(&id, patch).await.unwrap().unwrap();
        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Ready);
        assert_eq!(stored.ready_at, Some(7));
    }

    #[tokio::test]
    async fn test_put_upserts() {
        let store = store();
        let mut rx = store.subscribe();
        let mut order = sample_order("Budi", 1);
        order.id = "fixed".to_string();
        store.put(order.clone()).await.unwrap();
        order.customer_name = "Budi S".to_string();
        store.put(order).await.unwrap();

        assert!(matches!(rx.recv().await.unwrap(), OrderChange::Created { .. }));
        assert!(matches!(rx.recv().await.unwrap(), OrderChange::Updated { order } if order.customer_name == "Budi S"));
    }
}

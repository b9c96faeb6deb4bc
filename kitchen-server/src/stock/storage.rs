//! redb-backed stock ledger
//!
//! A transaction is one redb write transaction: read every `stock` entry,
//! run the update, write the result and bump `stock_meta.version`. redb
//! serializes write transactions, so the read-modify-write is atomic without
//! a retry loop.

use super::ledger::{StockLedger, StockTransition, StockUpdate};
use crate::db::{KitchenDb, STOCK_META_TABLE, STOCK_TABLE, STOCK_VERSION_KEY, StorageResult};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable};
use shared::models::StockLevels;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

pub struct RedbStockLedger {
    db: KitchenDb,
    tx: watch::Sender<StockLevels>,
    /// Version of the levels currently in the watch channel
    published: Arc<AtomicU64>,
}

impl std::fmt::Debug for RedbStockLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStockLedger")
            .field("published", &self.published.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

fn read_levels<T: ReadableTable<&'static str, u64>>(table: &T) -> StorageResult<StockLevels> {
    let mut levels = StockLevels::new();
    for entry in table.iter()? {
        let (key, value) = entry?;
        levels.set(key.value(), value.value());
    }
    Ok(levels)
}

fn read_committed(db: &Database) -> StorageResult<(u64, StockLevels)> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(STOCK_TABLE)?;
    let meta = read_txn.open_table(STOCK_META_TABLE)?;
    let version = meta.get(STOCK_VERSION_KEY)?.map(|v| v.value()).unwrap_or(0);
    Ok((version, read_levels(&table)?))
}

impl RedbStockLedger {
    /// Open the ledger on an existing database, publishing the stored levels
    pub fn new(db: KitchenDb) -> StorageResult<Self> {
        let (version, levels) = read_committed(db.inner())?;
        let (tx, _) = watch::channel(levels);
        Ok(Self {
            db,
            tx,
            published: Arc::new(AtomicU64::new(version)),
        })
    }

    /// Publish levels committed at `version` unless something newer is already out
    fn publish(&self, version: u64, levels: &StockLevels) {
        let published = &self.published;
        self.tx.send_if_modified(|current| {
            if version <= published.load(Ordering::Acquire) {
                return false;
            }
            *current = levels.clone();
            published.store(version, Ordering::Release);
            true
        });
    }
}

#[async_trait]
impl StockLedger for RedbStockLedger {
    async fn read(&self) -> StorageResult<StockLevels> {
        let (_, levels) = self.db.blocking(read_committed).await?;
        Ok(levels)
    }

    async fn transact(&self, update: StockUpdate) -> StorageResult<StockTransition> {
        let (version, transition) = self
            .db
            .blocking(move |db| {
                let write_txn = db.begin_write()?;
                let result = {
                    let mut table = write_txn.open_table(STOCK_TABLE)?;
                    let mut meta = write_txn.open_table(STOCK_META_TABLE)?;

                    let before = read_levels(&table)?;
                    let after = update(&before);

                    for (ingredient, _) in before.iter() {
                        if !after.contains(ingredient.as_str()) {
                            table.remove(ingredient.as_str())?;
                        }
                    }
                    for (ingredient, count) in after.iter() {
                        table.insert(ingredient.as_str(), count)?;
                    }

                    let version = meta.get(STOCK_VERSION_KEY)?.map(|v| v.value()).unwrap_or(0) + 1;
                    meta.insert(STOCK_VERSION_KEY, version)?;

                    (version, StockTransition { before, after })
                };
                write_txn.commit()?;
                Ok(result)
            })
            .await?;

        self.publish(version, &transition.after);
        Ok(transition)
    }

    fn subscribe(&self) -> watch::Receiver<StockLevels> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::StockDelta;

    fn consume(ingredient: &'static str, units: i64) -> StockUpdate {
        Arc::new(move |levels: &StockLevels| levels.apply(&StockDelta::single(ingredient, -units)))
    }

    fn seed(pairs: &[(&'static str, u64)]) -> StockUpdate {
        let levels: StockLevels = pairs.iter().map(|(k, v)| (*k, *v)).collect();
        Arc::new(move |_: &StockLevels| levels.clone())
    }

    #[tokio::test]
    async fn test_transact_persists() {
        let ledger = RedbStockLedger::new(KitchenDb::open_in_memory().unwrap()).unwrap();
        ledger.transact(seed(&[("ayam", 20), ("jamur", 20)])).await.unwrap();
        let t = ledger.transact(consume("ayam", 4)).await.unwrap();
        assert_eq!(t.before.get("ayam"), 20);
        assert_eq!(t.after.get("ayam"), 16);
        assert_eq!(ledger.read().await.unwrap().get("ayam"), 16);
    }

    #[tokio::test]
    async fn test_levels_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kitchen.redb");
        {
            let ledger = RedbStockLedger::new(KitchenDb::open(&path).unwrap()).unwrap();
            ledger.transact(seed(&[("jamur", 7)])).await.unwrap();
        }
        let ledger = RedbStockLedger::new(KitchenDb::open(&path).unwrap()).unwrap();
        assert_eq!(ledger.subscribe().borrow().get("jamur"), 7);
        assert_eq!(ledger.read().await.unwrap().get("jamur"), 7);
    }

    #[tokio::test]
    async fn test_concurrent_transactions_no_lost_update() {
        let ledger = Arc::new(RedbStockLedger::new(KitchenDb::open_in_memory().unwrap()).unwrap());
        ledger.transact(seed(&[("jamur", 10)])).await.unwrap();

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.transact(consume("jamur", 3)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(ledger.read().await.unwrap().get("jamur"), 1);
        assert_eq!(ledger.subscribe().borrow().get("jamur"), 1);
    }
}

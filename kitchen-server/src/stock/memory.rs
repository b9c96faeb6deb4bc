//! In-memory stock ledger with optimistic concurrency
//!
//! Each transaction snapshots `(version, levels)`, yields, computes the new
//! levels and commits only if the version is unchanged. A conflicting commit
//! in between forces a retry from a fresh snapshot, so no update is lost.

use super::ledger::{StockLedger, StockTransition, StockUpdate};
use crate::db::StorageResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::StockLevels;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

#[derive(Debug)]
struct Versioned {
    version: u64,
    levels: StockLevels,
}

pub struct MemoryStockLedger {
    state: Mutex<Versioned>,
    tx: watch::Sender<StockLevels>,
    conflicts: AtomicU64,
}

impl std::fmt::Debug for MemoryStockLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStockLedger")
            .field("version", &self.state.lock().version)
            .field("conflicts", &self.conflicts())
            .finish()
    }
}

impl MemoryStockLedger {
    pub fn new(initial: StockLevels) -> Self {
        let (tx, _) = watch::channel(initial.clone());
        Self {
            state: Mutex::new(Versioned {
                version: 0,
                levels: initial,
            }),
            tx,
            conflicts: AtomicU64::new(0),
        }
    }

    /// Number of commits rejected because another transaction got there first
    pub fn conflicts(&self) -> u64 {
        self.conflicts.load(Ordering::Relaxed)
    }

    /// Committed transaction count
    pub fn version(&self) -> u64 {
        self.state.lock().version
    }

    fn snapshot(&self) -> (u64, StockLevels) {
        let state = self.state.lock();
        (state.version, state.levels.clone())
    }

    /// Commit `next` if nobody committed since `expected`
    fn compare_and_swap(&self, expected: u64, next: &StockLevels) -> bool {
        let mut state = self.state.lock();
        if state.version != expected {
            return false;
        }
        state.version += 1;
        state.levels = next.clone();
        // Published under the lock so subscribers see commits in order
        self.tx.send_replace(next.clone());
        true
    }
}

impl Default for MemoryStockLedger {
    fn default() -> Self {
        Self::new(StockLevels::new())
    }
}

#[async_trait]
impl StockLedger for MemoryStockLedger {
    async fn read(&self) -> StorageResult<StockLevels> {
        Ok(self.snapshot().1)
    }

    async fn transact(&self, update: StockUpdate) -> StorageResult<StockTransition> {
        loop {
            let (version, before) = self.snapshot();
            // Round-trip point: other transactions may commit here
            tokio::task::yield_now().await;
            let after = update(&before);

            if self.compare_and_swap(version, &after) {
                return Ok(StockTransition { before, after });
            }

            let conflicts = self.conflicts.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(version, conflicts, "Stock transaction conflict, retrying");
        }
    }

    fn subscribe(&self) -> watch::Receiver<StockLevels> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::StockDelta;
    use std::sync::Arc;

    fn consume(ingredient: &'static str, units: i64) -> StockUpdate {
        Arc::new(move |levels: &StockLevels| levels.apply(&StockDelta::single(ingredient, -units)))
    }

    #[tokio::test]
    async fn test_transact_commits() {
        let ledger = MemoryStockLedger::new([("jamur", 10u64)].into_iter().collect());
        let t = ledger.transact(consume("jamur", 3)).await.unwrap();
        assert_eq!(t.before.get("jamur"), 10);
        assert_eq!(t.after.get("jamur"), 7);
        assert_eq!(ledger.version(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_transactions_no_lost_update() {
        let ledger = Arc::new(MemoryStockLedger::new([("jamur", 10u64)].into_iter().collect()));

        let a = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.transact(consume("jamur", 3)).await })
        };
        let b = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.transact(consume("jamur", 3)).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(ledger.read().await.unwrap().get("jamur"), 4);
        assert_eq!(ledger.version(), 2);
    }

    #[tokio::test]
    async fn test_interleaved_join_forces_retry() {
        let ledger = MemoryStockLedger::new([("jamur", 10u64)].into_iter().collect());
        let (a, b) = tokio::join!(
            ledger.transact(consume("jamur", 3)),
            ledger.transact(consume("jamur", 3))
        );
        a.unwrap();
        b.unwrap();
        assert_eq!(ledger.read().await.unwrap().get("jamur"), 4);
        // Both snapshot version 0 before either commits
        assert!(ledger.conflicts() >= 1);
    }

    #[tokio::test]
    async fn test_subscribe_sees_commit() {
        let ledger = MemoryStockLedger::new([("ayam", 5u64)].into_iter().collect());
        let mut rx = ledger.subscribe();
        ledger.transact(consume("ayam", 1)).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().get("ayam"), 4);
    }
}

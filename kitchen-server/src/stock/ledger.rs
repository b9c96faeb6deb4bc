//! Stock ledger abstraction
//!
//! The ledger is one shared record (`ingredient → count`). Every change goes
//! through [`StockLedger::transact`], which runs a pure update function as a
//! single atomic read-modify-write. Backends differ only in how they get that
//! atomicity: the memory ledger retries on version conflict, the redb ledger
//! relies on redb's serialized write transactions.

use crate::db::StorageResult;
use async_trait::async_trait;
use shared::models::{Ingredient, StockDelta, StockLevels};
use std::sync::Arc;
use tokio::sync::watch;

/// Pure update function run inside a ledger transaction
///
/// May be invoked more than once (memory backend retries), so it must not
/// have side effects.
pub type StockUpdate = Arc<dyn Fn(&StockLevels) -> StockLevels + Send + Sync>;

/// Levels seen by a committed transaction and the levels it wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockTransition {
    pub before: StockLevels,
    pub after: StockLevels,
}

#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Current committed levels
    async fn read(&self) -> StorageResult<StockLevels>;

    /// Atomically replace the levels with `update(current)`
    async fn transact(&self, update: StockUpdate) -> StorageResult<StockTransition>;

    /// Levels after every committed transaction
    fn subscribe(&self) -> watch::Receiver<StockLevels>;
}

/// Apply a signed delta, clamping every touched entry at 0
///
/// Empty deltas skip the transaction entirely.
pub async fn apply_delta(ledger: &dyn StockLedger, delta: &StockDelta) -> StorageResult<StockLevels> {
    if delta.is_empty() {
        return ledger.read().await;
    }

    let owned = delta.clone();
    let transition = ledger
        .transact(Arc::new(move |current: &StockLevels| current.apply(&owned)))
        .await?;

    let shortfall = transition.before.shortfall(delta);
    if !shortfall.is_zero() {
        tracing::warn!(
            delta = %delta,
            shortfall = %shortfall,
            "Stock insufficient, clamped at 0"
        );
    }

    tracing::debug!(delta = %delta, levels = %transition.after, "Stock adjusted");
    Ok(transition.after)
}

/// Set one ledger entry to an absolute count (manual adjustment)
pub async fn set_level(
    ledger: &dyn StockLedger,
    ingredient: Ingredient,
    count: u64,
) -> StorageResult<StockTransition> {
    ledger
        .transact(Arc::new(move |current: &StockLevels| {
            let mut next = current.clone();
            next.set(ingredient.clone(), count);
            next
        }))
        .await
}

/// Write `initial` only when the ledger has no entries yet
///
/// Returns true when the seed was applied.
pub async fn seed_if_empty(ledger: &dyn StockLedger, initial: StockLevels) -> StorageResult<bool> {
    if initial.is_empty() {
        return Ok(false);
    }
    let transition = ledger
        .transact(Arc::new(move |current: &StockLevels| {
            if current.is_empty() {
                initial.clone()
            } else {
                current.clone()
            }
        }))
        .await?;
    Ok(transition.before.is_empty())
}

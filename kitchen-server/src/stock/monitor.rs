//! Low-stock alerts
//!
//! Watches the ledger and warns once when an ingredient drops below the
//! threshold. It re-arms after the ingredient is restocked to the threshold
//! or above.

use shared::models::{Ingredient, StockLevels};
use std::collections::BTreeSet;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowStockMonitor {
    threshold: u64,
}

/// Change in the low-stock set between two ledger states
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LowStockChange {
    /// Newly below the threshold, with the current count
    pub alerts: Vec<(Ingredient, u64)>,
    /// Back at or above the threshold
    pub recovered: Vec<Ingredient>,
}

impl LowStockMonitor {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Ingredients currently below the threshold
    pub fn low_items(&self, levels: &StockLevels) -> Vec<(Ingredient, u64)> {
        levels.below(self.threshold)
    }

    /// Compare against the previously known low set, updating it in place
    pub fn diff(&self, low: &mut BTreeSet<Ingredient>, levels: &StockLevels) -> LowStockChange {
        let now: Vec<(Ingredient, u64)> = self.low_items(levels);
        let now_set: BTreeSet<Ingredient> = now.iter().map(|(k, _)| k.clone()).collect();

        let change = LowStockChange {
            alerts: now.into_iter().filter(|(k, _)| !low.contains(k)).collect(),
            recovered: low.difference(&now_set).cloned().collect(),
        };
        *low = now_set;
        change
    }

    /// Spawn the watcher task; ends when the ledger is dropped
    pub fn spawn(self, mut rx: watch::Receiver<StockLevels>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut low = BTreeSet::new();
            loop {
                let levels = rx.borrow_and_update().clone();
                let change = self.diff(&mut low, &levels);
                for (ingredient, count) in &change.alerts {
                    tracing::warn!(
                        ingredient = %ingredient,
                        count = *count,
                        threshold = self.threshold,
                        "Low stock"
                    );
                }
                for ingredient in &change.recovered {
                    tracing::info!(ingredient = %ingredient, "Stock replenished");
                }

                if rx.changed().await.is_err() {
                    tracing::debug!("Stock ledger closed, low-stock monitor stopping");
                    break;
                }
            }
        })
    }
}

impl Default for LowStockMonitor {
    fn default() -> Self {
        Self::new(10)
    }
}

//! Order/stock reconciliation engine
//!
//! Every order mutation is two writes: the order record, then one ledger
//! transaction carrying the usage difference. The engine keeps
//!
//! ```text
//! ledger[i] = initial[i] − Σ usage(order.items)   over live orders
//! ```
//!
//! (modulo clamping at 0 and manual adjustments).
//!
//! # Flow
//!
//! ```text
//! create:  normalize → validate → store.create  → ledger −usage(new)
//! update:  normalize → validate → store.replace → ledger +usage(old) −usage(new)
//! delete:  store.take → ledger +usage(old)
//! status:  store.patch (no stock effect)
//! ```
//!
//! `replace` and `take` return the record they overwrote or removed, so the
//! delta is always computed against what was actually in the store, and two
//! concurrent deletes restore stock once. `replace` also builds the new record
//! from the stored one inside the same atomic step, so a status change that
//! lands during an edit keeps its status and timestamps.
//!
//! The two writes are not atomic together. When the ledger transaction fails
//! after the order write committed, the engine returns
//! [`EngineError::LedgerNotAdjusted`] with the pending delta and logs it at
//! `error` for manual reconciliation. Nothing is rolled back.

use super::draft::{build_new_order, build_replacement, normalize_draft, validate_draft};
use super::error::{EngineError, EngineResult};
use super::store::OrderStore;
use crate::audit_log;
use crate::catalog::MenuCatalog;
use crate::stock::{StockLedger, apply_delta, compute_usage, set_level};
use shared::models::{Ingredient, IngredientUsage, StockDelta, StockLevels};
use shared::order::{Order, OrderDraft, OrderLineItem, OrderPatch, OrderStatus};
use shared::util::now_millis;
use std::sync::Arc;

/// Which status changes `update_order_status` accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Any status may follow any other
    #[default]
    Permissive,
    /// Forward only; nothing leaves `completed`
    Forward,
}

impl StatusPolicy {
    pub fn allows(self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            StatusPolicy::Permissive => true,
            StatusPolicy::Forward => from.can_transition_to(to),
        }
    }
}

#[derive(Clone)]
pub struct OrderEngine {
    orders: Arc<dyn OrderStore>,
    ledger: Arc<dyn StockLedger>,
    catalog: Arc<MenuCatalog>,
    status_policy: StatusPolicy,
}

impl std::fmt::Debug for OrderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEngine")
            .field("status_policy", &self.status_policy)
            .finish_non_exhaustive()
    }
}

impl OrderEngine {
    pub fn new(orders: Arc<dyn OrderStore>, ledger: Arc<dyn StockLedger>, catalog: Arc<MenuCatalog>) -> Self {
        Self {
            orders,
            ledger,
            catalog,
            status_policy: StatusPolicy::default(),
        }
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    pub fn orders(&self) -> &Arc<dyn OrderStore> {
        &self.orders
    }

    pub fn ledger(&self) -> &Arc<dyn StockLedger> {
        &self.ledger
    }

    pub fn catalog(&self) -> &Arc<MenuCatalog> {
        &self.catalog
    }

    /// Ingredient usage of `items`, warning about menu ids the catalog lacks
    fn usage_of(&self, order_id: &str, items: &[OrderLineItem]) -> IngredientUsage {
        let breakdown = compute_usage(&self.catalog, items);
        for menu_id in &breakdown.catalog_misses {
            tracing::warn!(
                order_id = %order_id,
                menu_id = %menu_id,
                "Menu item not in catalog, no stock consumed"
            );
        }
        breakdown.usage
    }

    /// Second phase of every mutation: push the usage difference to the ledger
    async fn adjust_stock(&self, order_id: &str, delta: StockDelta) -> EngineResult<()> {
        if delta.is_empty() {
            return Ok(());
        }
        match apply_delta(self.ledger.as_ref(), &delta).await {
            Ok(levels) => {
                audit_log!("stock.adjust", format!("order:{order_id}"), format!("{delta} -> {levels}"));
                Ok(())
            }
            Err(source) => {
                tracing::error!(
                    order_id = %order_id,
                    pending_delta = %delta,
                    error = %source,
                    "Order saved but stock ledger not adjusted, manual reconciliation needed"
                );
                Err(EngineError::LedgerNotAdjusted {
                    order_id: order_id.to_string(),
                    delta,
                    source,
                })
            }
        }
    }

    // ========== Order operations ==========

    /// Create an order and consume its ingredients; returns the new order id
    pub async fn create_order(&self, draft: OrderDraft) -> EngineResult<String> {
        let draft = normalize_draft(draft);
        let totals = validate_draft(&draft)?;

        let order = build_new_order(draft, totals);
        let order_number = order.order_number.clone();
        let items = order.items.clone();

        let order_id = self.orders.create(order).await?;
        tracing::info!(order_id = %order_id, order_number = %order_number, "Order created");
        audit_log!("order.create", format!("order:{order_id}"), order_number.as_str());

        let usage = self.usage_of(&order_id, &items);
        self.adjust_stock(&order_id, StockDelta::consume(&usage)).await?;
        Ok(order_id)
    }

    /// Replace an order's contents and apply the usage difference
    pub async fn update_order(&self, order_id: &str, draft: OrderDraft) -> EngineResult<Order> {
        let draft = normalize_draft(draft);
        let totals = validate_draft(&draft)?;

        let (previous, replacement) = self
            .orders
            .replace(
                order_id,
                Box::new(move |current: &Order| build_replacement(current, draft, totals)),
            )
            .await?
            .ok_or_else(|| EngineError::OrderNotFound(order_id.to_string()))?;
        tracing::info!(order_id = %order_id, order_number = %replacement.order_number, "Order updated");
        audit_log!("order.update", format!("order:{order_id}"), replacement.order_number.as_str());

        let old_usage = self.usage_of(order_id, &previous.items);
        let new_usage = self.usage_of(order_id, &replacement.items);
        self.adjust_stock(order_id, StockDelta::between(&old_usage, &new_usage))
            .await?;
        Ok(replacement)
    }

    /// Delete an order and restore its ingredients
    ///
    /// Returns `Ok(false)` when the order was already gone.
    pub async fn delete_order(&self, order_id: &str) -> EngineResult<bool> {
        let Some(removed) = self.orders.take(order_id).await? else {
            tracing::debug!(order_id = %order_id, "Delete of missing order ignored");
            return Ok(false);
        };
        tracing::info!(order_id = %order_id, order_number = %removed.order_number, "Order deleted");
        audit_log!("order.delete", format!("order:{order_id}"), removed.order_number.as_str());

        let usage = self.usage_of(order_id, &removed.items);
        self.adjust_stock(order_id, StockDelta::restore(&usage)).await?;
        Ok(true)
    }

    /// Move an order to `status`, stamping the matching timestamp if unset
    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> EngineResult<Order> {
        let current = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| EngineError::OrderNotFound(order_id.to_string()))?;

        if !self.status_policy.allows(current.status, status) {
            return Err(EngineError::InvalidTransition {
                order_id: order_id.to_string(),
                from: current.status,
                to: status,
            });
        }

        let now = now_millis();
        let mut patch = OrderPatch {
            status: Some(status),
            ..Default::default()
        };
        match status {
            OrderStatus::Preparing if current.started_at.is_none() => patch.started_at = Some(now),
            OrderStatus::Ready if current.ready_at.is_none() => patch.ready_at = Some(now),
            OrderStatus::Completed if current.completed_at.is_none() => patch.completed_at = Some(now),
            _ => {}
        }

        let updated = self
            .orders
            .patch(order_id, patch)
            .await?
            .ok_or_else(|| EngineError::OrderNotFound(order_id.to_string()))?;
        tracing::info!(order_id = %order_id, from = %current.status, to = %status, "Order status changed");
        audit_log!(
            "order.status",
            format!("order:{order_id}"),
            format!("{} -> {}", current.status, status)
        );
        Ok(updated)
    }

    pub async fn get_order(&self, order_id: &str) -> EngineResult<Option<Order>> {
        Ok(self.orders.get(order_id).await?)
    }

    pub async fn list_orders(&self) -> EngineResult<Vec<Order>> {
        Ok(self.orders.list().await?)
    }

    // ========== Stock operations ==========

    pub async fn stock_levels(&self) -> EngineResult<StockLevels> {
        Ok(self.ledger.read().await?)
    }

    /// Manual stock adjustment (absolute count, negative input clamps to 0)
    pub async fn set_stock_level(&self, ingredient: impl Into<Ingredient>, value: i64) -> EngineResult<StockLevels> {
        let ingredient = ingredient.into();
        let count = value.max(0) as u64;
        let transition = set_level(self.ledger.as_ref(), ingredient.clone(), count).await?;
        tracing::info!(
            ingredient = %ingredient,
            from = transition.before.get(ingredient.as_str()),
            to = count,
            "Stock level set"
        );
        audit_log!(
            "stock.set",
            format!("stock:{ingredient}"),
            format!("{} -> {}", transition.before.get(ingredient.as_str()), count)
        );
        Ok(transition.after)
    }
}

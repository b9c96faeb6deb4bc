//! Persisted order record, draft and patch types

use super::types::{
    AdditionalLineItem, OrderLineItem, OrderStatus, OrderType, PaymentMethod, Priority,
};
use serde::{Deserialize, Serialize};

/// Cached totals, computed at write time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Σ items.quantity
    pub total_items: u32,
    /// Σ items.quantity × pack_size
    pub total_pieces: u32,
    /// Σ items.subtotal + Σ additionals.subtotal
    pub total_price: i64,
}

impl OrderTotals {
    /// Totals of the given lines, `None` if any product or sum overflows
    pub fn compute(items: &[OrderLineItem], additionals: &[AdditionalLineItem]) -> Option<Self> {
        let mut totals = Self::default();
        for item in items {
            totals.total_items = totals.total_items.checked_add(item.quantity)?;
            totals.total_pieces = totals.total_pieces.checked_add(item.pieces()?)?;
            totals.total_price = totals.total_price.checked_add(item.line_total()?)?;
        }
        for additional in additionals {
            totals.total_price = totals.total_price.checked_add(additional.line_total()?)?;
        }
        Some(totals)
    }
}

/// Order record as stored (one per key in the order store)
///
/// Optional fields are skipped when empty so the stored JSON never carries
/// `null` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Store-assigned key
    pub id: String,
    /// Display label (e.g. `D042`), not unique
    pub order_number: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub items: Vec<OrderLineItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additionals: Vec<AdditionalLineItem>,
    pub total_items: u32,
    pub total_pieces: u32,
    pub total_price: i64,
}

impl Order {
    /// Apply a status patch in place
    pub fn apply_patch(&mut self, patch: &OrderPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(ts) = patch.started_at {
            self.started_at = Some(ts);
        }
        if let Some(ts) = patch.ready_at {
            self.ready_at = Some(ts);
        }
        if let Some(ts) = patch.completed_at {
            self.completed_at = Some(ts);
        }
    }

    /// Minutes between start and completion, when both are known
    pub fn prep_minutes(&self) -> Option<f64> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some((end - start) as f64 / 60_000.0),
            _ => None,
        }
    }
}

/// Order body submitted by the admin form (create or full replacement)
///
/// Bookkeeping fields are optional: create fills defaults, update keeps the
/// stored values unless the draft supplies new ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OrderDraft {
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub started_at: Option<i64>,
    #[serde(default)]
    pub ready_at: Option<i64>,
    #[serde(default)]
    pub completed_at: Option<i64>,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub items: Vec<OrderLineItem>,
    #[serde(default)]
    pub additionals: Vec<AdditionalLineItem>,
}

/// Partial update used only by status transitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

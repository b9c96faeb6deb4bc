//! Draft validation, normalization and record building
//!
//! Everything here is synchronous and side-effect free; the engine calls it
//! before touching the store.

use super::number::generate_order_number;
use shared::order::{Order, OrderDraft, OrderStatus, OrderTotals, OrderType};
use shared::util::now_millis;
use thiserror::Error;

/// Draft rejected before any write
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Customer name is required")]
    EmptyCustomerName,

    #[error("Order has no items")]
    EmptyItems,

    #[error("Table number is required for dine-in orders")]
    MissingTableNumber,

    #[error("Item {0} has zero quantity")]
    ZeroQuantity(String),

    #[error("Order quantities are out of range")]
    QuantityOutOfRange,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim strings, drop empty optionals and recompute subtotals
pub fn normalize_draft(mut draft: OrderDraft) -> OrderDraft {
    draft.customer_name = draft.customer_name.trim().to_string();
    draft.customer_phone = non_empty(draft.customer_phone);
    draft.table_number = match draft.order_type {
        OrderType::DineIn => non_empty(draft.table_number),
        _ => None,
    };
    draft.order_number = non_empty(draft.order_number);

    for item in &mut draft.items {
        item.note = non_empty(item.note.take());
        item.subtotal = item.price.saturating_mul(i64::from(item.quantity));
    }

    draft.additionals.retain(|a| a.quantity > 0);
    for additional in &mut draft.additionals {
        additional.subtotal = additional.price.saturating_mul(i64::from(additional.quantity));
    }
    draft
}

/// Reject drafts that must not reach the store (expects a normalized draft)
///
/// Returns the order totals, which are only defined for drafts whose pieces
/// and prices fit the stored number types.
pub fn validate_draft(draft: &OrderDraft) -> Result<OrderTotals, ValidationError> {
    if draft.customer_name.trim().is_empty() {
        return Err(ValidationError::EmptyCustomerName);
    }
    if draft.items.is_empty() {
        return Err(ValidationError::EmptyItems);
    }
    if draft.order_type == OrderType::DineIn
        && draft.table_number.as_deref().is_none_or(|t| t.trim().is_empty())
    {
        return Err(ValidationError::MissingTableNumber);
    }
    if let Some(item) = draft.items.iter().find(|i| i.quantity == 0) {
        return Err(ValidationError::ZeroQuantity(item.id.clone()));
    }
    OrderTotals::compute(&draft.items, &draft.additionals).ok_or(ValidationError::QuantityOutOfRange)
}

/// Record for a new order; the store assigns the id
pub fn build_new_order(draft: OrderDraft, totals: OrderTotals) -> Order {
    Order {
        id: String::new(),
        order_number: draft.order_number.unwrap_or_else(generate_order_number),
        status: draft.status.unwrap_or(OrderStatus::Pending),
        priority: draft.priority,
        created_at: draft.created_at.unwrap_or_else(now_millis),
        started_at: draft.started_at,
        ready_at: draft.ready_at,
        completed_at: draft.completed_at,
        order_type: draft.order_type,
        table_number: draft.table_number,
        payment_method: draft.payment_method,
        customer_name: draft.customer_name,
        customer_phone: draft.customer_phone,
        items: draft.items,
        additionals: draft.additionals,
        total_items: totals.total_items,
        total_pieces: totals.total_pieces,
        total_price: totals.total_price,
    }
}

/// Full replacement of `current`: draft fields win, bookkeeping fields the
/// draft leaves out keep their stored values
pub fn build_replacement(current: &Order, draft: OrderDraft, totals: OrderTotals) -> Order {
    Order {
        id: current.id.clone(),
        order_number: draft
            .order_number
            .unwrap_or_else(|| current.order_number.clone()),
        status: draft.status.unwrap_or(current.status),
        priority: draft.priority,
        created_at: draft.created_at.unwrap_or(current.created_at),
        started_at: draft.started_at.or(current.started_at),
        ready_at: draft.ready_at.or(current.ready_at),
        completed_at: draft.completed_at.or(current.completed_at),
        order_type: draft.order_type,
        table_number: draft.table_number,
        payment_method: draft.payment_method,
        customer_name: draft.customer_name,
        customer_phone: draft.customer_phone,
        items: draft.items,
        additionals: draft.additionals,
        total_items: totals.total_items,
        total_pieces: totals.total_pieces,
        total_price: totals.total_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MenuCatalog;

    fn draft(items: &[(&str, u32)]) -> OrderDraft {
        let catalog = MenuCatalog::builtin();
        OrderDraft {
            customer_name: "Budi".to_string(),
            items: items
                .iter()
                .map(|(id, qty)| catalog.line_item(id, *qty, None).unwrap())
                .collect(),
            ..Default::default()
        }
    }

    fn new_order(d: OrderDraft) -> Order {
        let totals = validate_draft(&d).unwrap();
        build_new_order(d, totals)
    }

    // ========== Validation ==========

    #[test]
    fn test_validation_rules() {
        let mut d = draft(&[("pack_4_ayam", 1)]);
        assert!(validate_draft(&d).is_ok());

        d.customer_name = "   ".to_string();
        assert_eq!(validate_draft(&d), Err(ValidationError::EmptyCustomerName));

        let empty = draft(&[]);
        assert_eq!(validate_draft(&empty), Err(ValidationError::EmptyItems));

        let mut dine_in = draft(&[("pack_4_ayam", 1)]);
        dine_in.order_type = OrderType::DineIn;
        assert_eq!(validate_draft(&dine_in), Err(ValidationError::MissingTableNumber));
        dine_in.table_number = Some("A3".to_string());
        assert!(validate_draft(&dine_in).is_ok());

        let zero = draft(&[("pack_4_ayam", 0)]);
        assert!(matches!(validate_draft(&zero), Err(ValidationError::ZeroQuantity(_))));
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        // 4 pieces × 1.1e9 does not fit the u32 piece count
        let d = normalize_draft(draft(&[("pack_4_ayam", 1_100_000_000)]));
        assert_eq!(validate_draft(&d), Err(ValidationError::QuantityOutOfRange));

        let d = normalize_draft(draft(&[("pack_4_ayam", 1_000_000)]));
        let totals = validate_draft(&d).unwrap();
        assert_eq!(totals.total_pieces, 4_000_000);
        assert_eq!(totals.total_price, 14_000_000_000);
    }

    // ========== Normalization ==========

    #[test]
    fn test_normalize_strips_empty_fields() {
        let catalog = MenuCatalog::builtin();
        let mut d = draft(&[("pack_6_mix", 2)]);
        d.customer_name = "  Sari ".to_string();
        d.customer_phone = Some("  ".to_string());
        d.table_number = Some("B1".to_string());
        d.items[0].note = Some("".to_string());
        d.items[0].subtotal = 0;
        d.additionals = vec![
            catalog.additional_line("potato_crunch", 0).unwrap(),
            catalog.additional_line("chili_oil_5ml", 2).unwrap(),
        ];

        let d = normalize_draft(d);
        assert_eq!(d.customer_name, "Sari");
        assert_eq!(d.customer_phone, None);
        // Takeaway orders carry no table number
        assert_eq!(d.table_number, None);
        assert_eq!(d.items[0].note, None);
        assert_eq!(d.items[0].subtotal, 46000);
        assert_eq!(d.additionals.len(), 1);
    }

    // ========== Building ==========

    #[test]
    fn test_build_new_order_defaults() {
        let order = new_order(draft(&[("pack_4_ayam", 2)]));
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.order_number.starts_with('D'));
        assert!(order.created_at > 0);
        assert_eq!(order.total_items, 2);
        assert_eq!(order.total_pieces, 8);
        assert_eq!(order.total_price, 28000);
    }

    #[test]
    fn test_build_replacement_keeps_bookkeeping() {
        let mut current = new_order(draft(&[("pack_4_ayam", 1)]));
        current.id = "o1".to_string();
        current.status = OrderStatus::Preparing;
        current.started_at = Some(5);

        let d = draft(&[("pack_6_ayam", 1)]);
        let totals = validate_draft(&d).unwrap();
        let replacement = build_replacement(&current, d, totals);
        assert_eq!(replacement.id, "o1");
        assert_eq!(replacement.order_number, current.order_number);
        assert_eq!(replacement.status, OrderStatus::Preparing);
        assert_eq!(replacement.created_at, current.created_at);
        assert_eq!(replacement.started_at, Some(5));
        assert_eq!(replacement.total_pieces, 6);
    }
}

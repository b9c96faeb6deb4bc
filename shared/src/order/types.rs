//! Shared order enums and line item types

use crate::models::Variant;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Status
// ============================================================================

/// 订单状态 - pending → preparing → ready → completed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ];

    /// Next status on the kitchen board, `None` once completed
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    /// Forward-only rule: never backwards, nothing leaves `completed`.
    /// Re-applying the current status is allowed (no-op).
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        if self == target {
            return true;
        }
        self != OrderStatus::Completed && target > self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Order Type / Payment / Priority
// ============================================================================

/// 订单类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    /// 堂食 (requires a table number)
    DineIn,
    /// 外带
    #[default]
    Takeaway,
    /// 外送
    Delivery,
}

impl OrderType {
    pub const ALL: [OrderType; 3] = [OrderType::DineIn, OrderType::Takeaway, OrderType::Delivery];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine-in",
            OrderType::Takeaway => "takeaway",
            OrderType::Delivery => "delivery",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 支付方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Qris,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
}

// ============================================================================
// Line Items
// ============================================================================

/// Menu line item - the only thing that consumes stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    pub id: String,
    /// Menu catalog reference
    pub menu_id: String,
    /// Display copy of the menu name at order time
    pub menu_name: String,
    pub pack_size: u32,
    pub variant: Variant,
    pub quantity: u32,
    /// Unit price
    pub price: i64,
    /// price × quantity
    pub subtotal: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrderLineItem {
    /// pack_size × quantity, `None` on overflow
    pub fn pieces(&self) -> Option<u32> {
        self.pack_size.checked_mul(self.quantity)
    }

    /// price × quantity, `None` on overflow
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(i64::from(self.quantity))
    }
}

/// Add-on line item (chili oil, potato crunch, ...) - no stock impact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdditionalLineItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: i64,
    pub subtotal: i64,
}

impl AdditionalLineItem {
    /// price × quantity, `None` on overflow
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(i64::from(self.quantity))
    }
}

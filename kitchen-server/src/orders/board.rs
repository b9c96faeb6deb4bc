//! Kitchen board and customer display views over the live order list

use serde::Serialize;
use shared::order::{Order, OrderStatus};

/// Ready orders shown on the customer display
pub const CUSTOMER_DISPLAY_LIMIT: usize = 4;

/// Per-status counters shown above the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardCounts {
    pub pending: usize,
    pub preparing: usize,
    pub ready: usize,
    pub total: usize,
}

/// 厨房看板 - open orders grouped by status (completed orders are hidden)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KitchenBoard {
    pub pending: Vec<Order>,
    pub preparing: Vec<Order>,
    pub ready: Vec<Order>,
}

impl KitchenBoard {
    /// Group orders by status, keeping the input order within each column
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut board = Self::default();
        for order in orders {
            match order.status {
                OrderStatus::Pending => board.pending.push(order.clone()),
                OrderStatus::Preparing => board.preparing.push(order.clone()),
                OrderStatus::Ready => board.ready.push(order.clone()),
                OrderStatus::Completed => {}
            }
        }
        board
    }

    pub fn counts(&self) -> BoardCounts {
        BoardCounts {
            pending: self.pending.len(),
            preparing: self.preparing.len(),
            ready: self.ready.len(),
            total: self.pending.len() + self.preparing.len() + self.ready.len(),
        }
    }

    pub fn column(&self, status: OrderStatus) -> &[Order] {
        match status {
            OrderStatus::Pending => &self.pending,
            OrderStatus::Preparing => &self.preparing,
            OrderStatus::Ready => &self.ready,
            OrderStatus::Completed => &[],
        }
    }
}

/// Customer-facing screen: latest ready orders and what is being prepared
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerDisplay {
    /// Most recently ready first, at most [`CUSTOMER_DISPLAY_LIMIT`]
    pub ready: Vec<Order>,
    pub preparing: Vec<Order>,
}

impl CustomerDisplay {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut ready: Vec<Order> = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Ready)
            .cloned()
            .collect();
        ready.sort_by_key(|o| std::cmp::Reverse(o.ready_at.unwrap_or(0)));
        ready.truncate(CUSTOMER_DISPLAY_LIMIT);

        let preparing = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Preparing)
            .cloned()
            .collect();

        Self { ready, preparing }
    }
}

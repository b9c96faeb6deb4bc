//! Orders
//!
//! - **store**: `OrderStore` trait (one record per order, change broadcast)
//! - **memory** / **storage**: DashMap and redb stores
//! - **draft**: validation, normalization and record building
//! - **engine**: order/stock reconciliation
//! - **feed** / **board**: live order list and kitchen board views
//!
//! # Architecture
//!
//! ```text
//! OrderDraft → OrderEngine → OrderStore (create/replace/take/patch)
//!                   ↓                ↓
//!            StockLedger        OrderChange broadcast
//!                   ↓                ↓
//!           LowStockMonitor      OrderFeed → KitchenBoard
//! ```

pub mod board;
pub mod draft;
pub mod engine;
pub mod error;
pub mod feed;
pub mod memory;
pub mod number;
pub mod storage;
pub mod store;

// Re-exports
pub use board::{BoardCounts, CustomerDisplay, KitchenBoard};
pub use draft::ValidationError;
pub use engine::{OrderEngine, StatusPolicy};
pub use error::{EngineError, EngineResult};
pub use feed::OrderFeed;
pub use memory::MemoryOrderStore;
pub use number::generate_order_number;
pub use storage::RedbOrderStore;
pub use store::OrderStore;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::catalog::MenuCatalog;
    use shared::order::{Order, OrderDraft};

    /// One pack_4_ayam order for `customer`, created at `created_at`
    pub fn sample_order(customer: &str, created_at: i64) -> Order {
        let catalog = MenuCatalog::builtin();
        let draft = OrderDraft {
            customer_name: customer.to_string(),
            created_at: Some(created_at),
            items: vec![catalog.line_item("pack_4_ayam", 1, None).unwrap()],
            ..Default::default()
        };
        let totals = super::draft::validate_draft(&draft).unwrap();
        super::draft::build_new_order(draft, totals)
    }
}

//! Stock ledger
//!
//! - **ledger**: `StockLedger` trait and the transaction helpers the engine uses
//! - **memory**: optimistic compare-and-swap ledger
//! - **storage**: redb ledger
//! - **usage**: ingredient usage of order line items
//! - **monitor**: low-stock alerts

pub mod ledger;
pub mod memory;
pub mod monitor;
pub mod storage;
pub mod usage;

// Re-exports
pub use ledger::{StockLedger, StockTransition, StockUpdate, apply_delta, seed_if_empty, set_level};
pub use memory::MemoryStockLedger;
pub use monitor::LowStockMonitor;
pub use storage::RedbStockLedger;
pub use usage::{UsageBreakdown, compute_usage};

//! Order types
//!
//! - Records: what the order store persists
//! - Drafts: what the admin form submits
//! - Changes: what subscribers receive after each committed write

pub mod event;
pub mod record;
pub mod types;

// Re-exports
pub use event::OrderChange;
pub use record::{Order, OrderDraft, OrderPatch, OrderTotals};
pub use types::*;

//! Data models
//!
//! Shared between kitchen-server and its display clients.

pub mod menu;
pub mod stock;

// Re-exports
pub use menu::*;
pub use stock::*;

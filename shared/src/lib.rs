//! Shared types for the kitchen workspace
//!
//! Domain models (menu, stock, orders), error codes and small utilities used
//! by kitchen-server and anything that renders its data.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use models::{Ingredient, IngredientUsage, MenuItem, StockDelta, StockLevels};
pub use order::{Order, OrderChange, OrderDraft, OrderStatus};

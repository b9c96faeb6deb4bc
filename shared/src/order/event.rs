//! Order change notifications

use super::record::Order;
use serde::{Deserialize, Serialize};

/// Change broadcast by an order store after every committed write
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderChange {
    Created { order: Order },
    Updated { order: Order },
    Deleted { order_id: String },
}

impl OrderChange {
    pub fn order_id(&self) -> &str {
        match self {
            OrderChange::Created { order } | OrderChange::Updated { order } => &order.id,
            OrderChange::Deleted { order_id } => order_id,
        }
    }
}

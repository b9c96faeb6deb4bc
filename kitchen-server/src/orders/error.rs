use super::draft::ValidationError;
use crate::db::StorageError;
use shared::models::StockDelta;
use shared::order::OrderStatus;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid order: {0}")]
    Validation(#[from] ValidationError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The order write committed but the matching ledger transaction did not
    #[error("Order {order_id} saved but stock not adjusted by {delta}: {source}")]
    LedgerNotAdjusted {
        order_id: String,
        delta: StockDelta,
        #[source]
        source: StorageError,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            EngineError::Validation(e) => match e {
                ValidationError::EmptyCustomerName => ErrorCode::CustomerNameRequired,
                ValidationError::EmptyItems => ErrorCode::OrderEmpty,
                ValidationError::MissingTableNumber => ErrorCode::TableNumberRequired,
                ValidationError::ZeroQuantity(_) => ErrorCode::InvalidQuantity,
                ValidationError::QuantityOutOfRange => ErrorCode::ValueOutOfRange,
            },
            EngineError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            EngineError::InvalidTransition { .. } => ErrorCode::InvalidStatusTransition,
            EngineError::Storage(e) => e.error_code(),
            EngineError::LedgerNotAdjusted { .. } => ErrorCode::StockNotAdjusted,
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let code = err.error_code();
        let message = err.to_string();
        let app = AppError::with_message(code, message);
        match err {
            EngineError::Validation(ValidationError::ZeroQuantity(item_id)) => {
                app.with_detail("item_id", item_id)
            }
            EngineError::OrderNotFound(order_id) => app.with_detail("order_id", order_id),
            EngineError::InvalidTransition { order_id, from, to } => app
                .with_detail("order_id", order_id)
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str()),
            EngineError::LedgerNotAdjusted { order_id, delta, .. } => app
                .with_detail("order_id", order_id)
                .with_detail("pending_delta", serde_json::to_value(&delta).unwrap_or_default()),
            _ => app,
        }
    }
}

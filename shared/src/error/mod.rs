//! Unified error system for the kitchen workspace
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`AppError`]: Error with code, message and structured details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::OrderEmpty).with_detail("field", "items");
//! assert_eq!(err.code.code(), 4007);
//! assert_eq!(err.details.unwrap()["field"], "items");
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};

//! Common infrastructure (logging)

pub mod logger;

pub use logger::{AUDIT_TARGET, init_logger, init_logger_with_file};

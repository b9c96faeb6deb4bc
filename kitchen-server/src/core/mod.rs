//! 核心模块 - 配置与服务器状态

pub mod config;
pub mod state;

pub use config::{Config, parse_stock_levels};
pub use state::ServerState;

//! Kitchen Server - 厨房订单与库存一致性服务
//!
//! # 架构概述
//!
//! - **订单** (`orders`): 订单存储、一致性引擎、实时看板
//! - **库存** (`stock`): 库存账本 (事务式读改写)、用量计算、低库存告警
//! - **菜单** (`catalog`): 只读菜单与配料组成
//! - **统计** (`stats`): 管理端统计报表
//! - **数据库** (`db`): 嵌入式 redb 存储
//!
//! # 模块结构
//!
//! ```text
//! kitchen-server/src/
//! ├── core/          # 配置、状态
//! ├── common/        # 日志
//! ├── db/            # redb 数据库
//! ├── catalog/       # 菜单
//! ├── stock/         # 库存账本
//! ├── orders/        # 订单与引擎
//! └── stats/         # 统计
//! ```

pub mod catalog;
pub mod common;
pub mod core;
pub mod db;
pub mod orders;
pub mod stats;
pub mod stock;

// Re-export 公共类型
pub use catalog::MenuCatalog;
pub use core::{Config, ServerState};
pub use db::{KitchenDb, StorageError, StorageResult};
pub use orders::{EngineError, OrderEngine, OrderFeed, OrderStore, StatusPolicy};
pub use stock::{LowStockMonitor, StockLedger};

// Re-export unified error types from shared
pub use shared::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use common::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 创建工作目录并初始化日志
///
/// 文件日志写入 `work_dir/logs`
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    config.ensure_work_dir_structure()?;
    init_logger_with_file(&config.log_level, config.log_json, Some(&config.log_dir()))?;
    Ok(())
}

use anyhow::Context;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::catalog::MenuCatalog;
use crate::core::Config;
use crate::db::KitchenDb;
use crate::orders::{EngineResult, OrderEngine, OrderFeed, OrderStore, RedbOrderStore, StatusPolicy};
use crate::stats::{DateRange, DateRangeType, StatsData};
use crate::stock::{LowStockMonitor, RedbStockLedger, StockLedger, seed_if_empty};

/// 服务器状态 - 持有所有服务的共享引用
///
/// | 字段 | 说明 |
/// |------|------|
/// | catalog | 菜单 (只读) |
/// | engine | 订单/库存一致性引擎 |
/// | feed | 实时订单列表 (厨房看板、顾客屏) |
/// | low_stock | 低库存告警 |
#[derive(Debug, Clone)]
pub struct ServerState {
    pub config: Config,
    pub catalog: Arc<MenuCatalog>,
    pub engine: OrderEngine,
    pub feed: Arc<OrderFeed>,
    pub low_stock: LowStockMonitor,
}

impl ServerState {
    /// 用给定的存储组装状态 (测试可注入内存实现)
    ///
    /// 启动订单订阅和低库存监控任务，必须在 tokio 运行时内调用
    pub async fn new(
        config: Config,
        catalog: Arc<MenuCatalog>,
        orders: Arc<dyn OrderStore>,
        ledger: Arc<dyn StockLedger>,
    ) -> anyhow::Result<Self> {
        if let Some(initial) = config.initial_stock.clone()
            && seed_if_empty(ledger.as_ref(), initial).await?
        {
            tracing::info!("Stock ledger seeded from INITIAL_STOCK");
        }

        let policy = if config.strict_status_transitions {
            StatusPolicy::Forward
        } else {
            StatusPolicy::Permissive
        };
        let engine = OrderEngine::new(orders.clone(), ledger.clone(), catalog.clone()).with_status_policy(policy);

        let feed = Arc::new(OrderFeed::start(orders).await?);
        let low_stock = LowStockMonitor::new(config.low_stock_threshold);
        low_stock.spawn(ledger.subscribe());

        Ok(Self {
            config,
            catalog,
            engine,
            feed,
            low_stock,
        })
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 菜单 (MENU_PATH 或内置菜单)
    /// 3. 数据库 (work_dir/database/kitchen.redb)
    /// 4. 订单存储、库存账本、引擎、订阅任务
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config
            .ensure_work_dir_structure()
            .context("Failed to create work directory structure")?;

        let catalog = match &config.menu_path {
            Some(path) => {
                let catalog = MenuCatalog::from_json_file(path)
                    .with_context(|| format!("Failed to load menu from {path}"))?;
                tracing::info!(path = %path, items = catalog.menu_items().len(), "Menu loaded");
                catalog
            }
            None => MenuCatalog::builtin(),
        };

        let db_path = config.database_path();
        let db = KitchenDb::open(&db_path)
            .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
        tracing::info!(path = %db_path.display(), "Database opened");

        let orders: Arc<dyn OrderStore> = Arc::new(RedbOrderStore::new(db.clone()));
        let ledger: Arc<dyn StockLedger> = Arc::new(RedbStockLedger::new(db)?);

        Self::new(config.clone(), Arc::new(catalog), orders, ledger).await
    }

    /// Statistics for a preset or custom range, in the configured timezone
    pub async fn stats(&self, kind: DateRangeType, custom: Option<(NaiveDate, NaiveDate)>) -> EngineResult<StatsData> {
        let tz = self.config.timezone;
        let now = chrono::Utc::now().with_timezone(&tz);
        let range = DateRange::resolve(kind, now, custom);
        let orders = self.engine.list_orders().await?;
        Ok(StatsData::compute(&orders, &range, tz))
    }

    /// Log current stock and anything already below the threshold
    pub async fn log_stock_summary(&self) -> EngineResult<()> {
        let levels = self.engine.stock_levels().await?;
        let orders = self.feed.snapshot().len();
        tracing::info!(stock = %levels, orders, "Kitchen ready");

        let low = self.low_stock.low_items(&levels);
        if !low.is_empty() {
            let names: Vec<String> = low.iter().map(|(i, n)| format!("{i}={n}")).collect();
            tracing::warn!(threshold = self.low_stock.threshold(), low = %names.join(", "), "Low stock at startup");
        }
        Ok(())
    }
}

//! 服务器状态集成测试
//!
//! 使用临时工作目录 (redb 落盘)，覆盖初始化、库存播种、看板与统计。

use kitchen_server::stats::DateRangeType;
use kitchen_server::{Config, ServerState};
use shared::models::StockLevels;
use shared::order::{OrderDraft, OrderStatus};
use tempfile::TempDir;

fn test_config(dir: &TempDir, stock: &[(&str, u64)]) -> Config {
    let mut config = Config::with_work_dir(dir.path().to_string_lossy().to_string());
    config.initial_stock = Some(stock.iter().map(|(k, v)| (*k, *v)).collect::<StockLevels>());
    config.strict_status_transitions = false;
    config.menu_path = None;
    config
}

fn draft(state: &ServerState, menu_id: &str, qty: u32) -> OrderDraft {
    OrderDraft {
        customer_name: "Sari".to_string(),
        items: vec![state.catalog.line_item(menu_id, qty, None).unwrap()],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_initialize_seeds_stock_and_creates_layout() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &[("ayam", 30), ("jamur", 25)]);
    let state = ServerState::initialize(&config).await.unwrap();

    assert!(config.database_path().exists());
    assert!(config.log_dir().is_dir());

    let levels = state.engine.stock_levels().await.unwrap();
    assert_eq!(levels.get("ayam"), 30);
    assert_eq!(levels.get("jamur"), 25);
    state.log_stock_summary().await.unwrap();
}

#[tokio::test]
async fn test_order_lifecycle_through_state() {
    let dir = TempDir::new().unwrap();
    let state = ServerState::initialize(&test_config(&dir, &[("ayam", 30), ("jamur", 30)]))
        .await
        .unwrap();

    let id = state.engine.create_order(draft(&state, "pack_6_mix", 2)).await.unwrap();
    let levels = state.engine.stock_levels().await.unwrap();
    assert_eq!((levels.get("ayam"), levels.get("jamur")), (24, 24));

    // Live feed picks the order up
    let mut rx = state.feed.subscribe();
    rx.wait_for(|orders| orders.iter().any(|o| o.id == id)).await.unwrap();
    assert_eq!(state.feed.board().counts().pending, 1);

    for status in [OrderStatus::Preparing, OrderStatus::Ready] {
        state.engine.update_order_status(&id, status).await.unwrap();
    }
    rx.wait_for(|orders| orders.iter().any(|o| o.id == id && o.status == OrderStatus::Ready))
        .await
        .unwrap();
    let display = state.feed.customer_display();
    assert_eq!(display.ready.len(), 1);
    assert!(display.preparing.is_empty());

    state.engine.update_order_status(&id, OrderStatus::Completed).await.unwrap();
    let stats = state.stats(DateRangeType::Today, None).await.unwrap();
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.completed_orders, 1);
    assert_eq!(stats.total_pieces, 12);
    assert_eq!(stats.total_revenue, 2 * 23000);

    // Completed orders leave the kitchen board but still hold their stock
    rx.wait_for(|orders| orders.iter().any(|o| o.id == id && o.status == OrderStatus::Completed))
        .await
        .unwrap();
    assert_eq!(state.feed.board().counts().total, 0);
    assert!(state.engine.delete_order(&id).await.unwrap());
    let levels = state.engine.stock_levels().await.unwrap();
    assert_eq!((levels.get("ayam"), levels.get("jamur")), (30, 30));
}

#[tokio::test]
async fn test_manual_stock_level() {
    let dir = TempDir::new().unwrap();
    let state = ServerState::initialize(&test_config(&dir, &[("ayam", 5)])).await.unwrap();

    let levels = state.engine.set_stock_level("jamur", 40).await.unwrap();
    assert_eq!(levels.get("jamur"), 40);
    let levels = state.engine.set_stock_level("ayam", -3).await.unwrap();
    assert_eq!(levels.get("ayam"), 0);
}

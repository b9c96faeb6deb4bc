use kitchen_server::{Config, ServerState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env 和配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 日志
    setup_environment(&config)?;
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "Kitchen server starting..."
    );

    // 3. 初始化服务器状态
    let state = ServerState::initialize(&config).await?;
    state.log_stock_summary().await?;

    // 4. 等待退出信号
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, exiting");
    Ok(())
}

//! 主程序入口
//!
//! 初始化日志与存储，装配核心服务并运行在场收割器。
//! 存储生命周期（init / shutdown）由这里负责，核心组件只持有注入的句柄。
//! HTTP 传输层在本仓库范围之外，经由服务返回的稳定错误码对接。

use config::AppConfig;
use infrastructure::build_services;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        ttl_secs = config.presence.ttl_secs,
        sweep_interval_secs = config.presence.sweep_interval_secs,
        broadcast_token = %config.chat.broadcast_token,
        "配置加载完成"
    );

    let services = build_services(&config).await?;
    services.reaper.start().await;

    tokio::signal::ctrl_c().await?;
    tracing::info!("收到退出信号，开始关闭");

    services.reaper.stop().await;
    if let Some(pool) = services.pool {
        pool.close().await;
    }
    Ok(())
}

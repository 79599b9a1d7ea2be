mod api;
mod application;
mod domain;
mod infrastructure;
mod ports;
#[cfg(test)]
mod testing;

use api::AppState;
use application::CheckoutUsecase;
use infrastructure::{
    AppConfig, HttpPaymentGateway, MySqlOrderRepository, MySqlOutboxPublisher, SystemClock,
};
use sqlx::MySqlPool;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    let config = AppConfig::from_env()?;

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Starting Checkout Service...");

    // 创建数据库连接池
    info!("Connecting to database...");
    let pool = Arc::new(MySqlPool::connect(&config.database_url).await?);
    info!("Database connected successfully");

    // 创建适配器
    let payment_config = Arc::new(config.payment.clone());
    info!("Payment gateway configured: {}", payment_config.base_url);
    let payment = Arc::new(HttpPaymentGateway::new(payment_config)?);
    let repository = Arc::new(MySqlOrderRepository::new(pool.clone()));
    let publisher = Arc::new(MySqlOutboxPublisher::new(pool));

    // 创建结账用例
    let checkout_usecase = Arc::new(CheckoutUsecase::new(
        repository,
        payment,
        publisher,
        Arc::new(SystemClock),
    ));

    let shutdown = CancellationToken::new();

    // 创建应用状态
    let app_state = AppState {
        checkout_usecase,
        shutdown: shutdown.clone(),
    };

    // 创建路由
    let app = api::create_router(app_state);

    let addr = config.listen_addr();
    info!("Server listening on {}", addr);
    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  POST /api/orders/:order_id/checkout - Checkout order");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received, cancelling in-flight checkouts");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}

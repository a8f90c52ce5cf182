// 任务追踪 API 服务
use std::sync::Arc;

use task_tracker::config::AppConfig;
use task_tracker::{handlers, services};
use tracing_subscriber::EnvFilter;
use warp::Filter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    let config = AppConfig::new()?;

    // 初始化日志，RUST_LOG 优先
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting task-tracker on {}", config.server_address());

    // 创建应用状态
    let app_state = Arc::new(services::AppState::new(config).await?);

    // 定义路由
    let api_routes = handlers::routes(app_state.clone());

    // 添加CORS和日志中间件
    let routes = api_routes
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allow_headers(vec!["content-type", "accept"]),
        )
        .with(warp::log("task_tracker::api"));

    // 启动服务器
    warp::serve(routes)
        .run(([0, 0, 0, 0], app_state.config.server.port))
        .await;

    Ok(())
}

use gymflow::bootstrap;
use gymflow::config::Config;
use gymflow::infrastructure::http::router::build_router;
use gymflow::infrastructure::observability;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    let _observability = observability::init(&config)?;
    tracing::info!("Configuration loaded");

    let class_repo = bootstrap::build_class_repository(&config);
    let state = bootstrap::build_app_state(&config, class_repo);

    let app = build_router(state);

    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use mindlens::api::{self, app_state::AppState};
use mindlens::classifier::create_safety_classifier;
use mindlens::config::loader::ConfigLoader;
use mindlens::observability::{AppMetrics, ObservabilityState, create_observability_router, init_tracing};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;

    let _log_guard = init_tracing(&config.app_name, &config.logging)?;
    info!("Starting Mindlens ({})...", config.environment);
    info!(
        "Configuration loaded: token budget {}, {} chars/token",
        config.compression.token_budget, config.compression.chars_per_token
    );

    let classifier = create_safety_classifier(&config.guardian)?;
    info!("Safety classifier initialized (backend: {})", config.guardian.backend);

    let metrics = Arc::new(AppMetrics::default());
    let app_state = AppState::new(&config, classifier, metrics.clone());
    info!("Application state created");

    // 创建可观测性状态并集成路由
    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        metrics,
    ));
    let api_router = api::create_router(app_state);
    let router = create_observability_router(observability_state)
        .merge(api_router)
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout)));
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

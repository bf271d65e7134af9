use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use moodsignal_api::{router, AnalysisPipeline, AppState};
use moodsignal_common::Config;
use moodsignal_retrieval::FallbackCoordinator;
use moodsignal_scoring::ModelContext;
use moodsignal_store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("moodsignal=info".parse()?))
        .init();

    let config = Config::from_env()?;
    config.log_redacted();

    let store = Store::new(&config.database_path);
    store.migrate().await?;

    let models = Arc::new(ModelContext::from_config(&config)?);
    let coordinator = FallbackCoordinator::from_config(&config)?;
    info!(strategies = ?coordinator.strategy_names(), "Retrieval chain ready");

    let state = Arc::new(AppState {
        pipeline: AnalysisPipeline::new(coordinator, models, store, config.max_items),
    });

    let app = router(state);

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("MoodSignal API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

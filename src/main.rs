use std::sync::Arc;

use gamestats_api::api::{create_router, AppState};
use gamestats_api::config::Config;
use gamestats_api::store::FileSource;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gamestats_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(data_dir = %config.data_dir.display(), "Configuration loaded");

    let state = AppState::new(Arc::new(FileSource::new(config.data_dir.clone())));

    if config.preload_datasets {
        state.catalog.preload().await?;
        tracing::info!("All datasets loaded");
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}

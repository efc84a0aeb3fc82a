use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_recs_api::api::{create_router, AppState, TopNLimits};
use movie_recs_api::catalog::{load_snapshot, CsvCatalogSource};
use movie_recs_api::config::Config;
use movie_recs_api::recommender::Recommender;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        catalog_path = %config.catalog_path,
        backend = %config.recommender_backend,
        "Starting movie recommendation service"
    );

    // Load the catalog once and build the recommender before serving
    let source = CsvCatalogSource::new(&config.catalog_path);
    let snapshot = load_snapshot(&source, config.catalog_limit)
        .await
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path))?;

    let options = config.recommender_options();
    let recommender =
        tokio::task::spawn_blocking(move || Recommender::build(Arc::new(snapshot), options))
            .await??;

    let state = AppState::new(
        recommender,
        TopNLimits {
            default: config.default_top_n,
            max: config.max_top_n,
        },
    );
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

//! Camp API server: reads settings from the environment, prepares the store and serves the API.

use camp_api::{
    app, ensure_database_exists, ensure_tables, seed, seed_sample_data, AppConfig, AppState, LinkGenerator,
    MemoryStore, PgRepositoryProvider, RepositoryProvider, StoreKind,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("camp_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let repositories: Arc<dyn RepositoryProvider> = match config.store {
        StoreKind::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            ensure_tables(&pool).await?;
            if config.seed_sample_data {
                seed_sample_data(&pool, seed::sample()).await?;
            }
            Arc::new(PgRepositoryProvider::new(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            if config.seed_sample_data {
                Arc::new(MemoryStore::seeded(seed::sample()))
            } else {
                Arc::new(MemoryStore::new())
            }
        }
    };

    let state = AppState::new(repositories, LinkGenerator::with_base_path(&config.base_path));
    let router = app(state, config.body_limit_bytes);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}

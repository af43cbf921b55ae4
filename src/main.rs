use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use atlas_forum_api::config;
use atlas_forum_api::database::{
    DatabaseManager, ForumData, ForumRepository, MemoryForumRepository, PgForumRepository,
    SiteFixture,
};
use atlas_forum_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Atlas Forum API in {:?} mode", config.environment);

    let repository = repository().await?;
    let app = app(AppState::new(repository));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Atlas Forum API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close().await;
    Ok(())
}

/// PostgreSQL when DATABASE_URL is set, otherwise an in-memory site seeded
/// from ATLAS_FIXTURE (or empty).
async fn repository() -> anyhow::Result<Arc<dyn ForumRepository>> {
    if DatabaseManager::is_configured() {
        let pool = DatabaseManager::pool().await?;
        tracing::info!("Using PostgreSQL repository");
        return Ok(Arc::new(PgForumRepository::new(pool)));
    }

    let data = match std::env::var("ATLAS_FIXTURE") {
        Ok(path) => {
            tracing::info!(fixture = %path, "Using in-memory repository seeded from fixture");
            SiteFixture::load(&path)?.into_data()?
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL and ATLAS_FIXTURE unset; starting with an empty in-memory repository");
            ForumData::default()
        }
    };

    Ok(Arc::new(MemoryForumRepository::new(data)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

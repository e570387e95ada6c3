use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use chrono::Utc;
use elite_api::{app, AppState};
use elite_store::{Config, DbClient, MemoryStore, PgStore, SeedData, StorageBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "elite_api=debug,elite_booking=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Elite Drive API on port {}", config.server.port);

    // SSE Broadcast Channel
    let (sse_tx, _) = tokio::sync::broadcast::channel(config.events.channel_capacity.max(1));

    let seed = if config.seed.enabled {
        SeedData::showroom(&config.seed, Utc::now())
    } else {
        SeedData::default()
    };

    let app_state = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory store ({} vehicles)", seed.vehicles.len());
            AppState::new(Arc::new(MemoryStore::from_seed(seed)), sse_tx)
        }
        StorageBackend::Postgres => {
            let db_config = config
                .database
                .as_ref()
                .context("[database] section is required for the postgres backend")?;
            let db = DbClient::new(db_config)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;

            let store = PgStore::new(db.pool.clone());
            if config.seed.enabled && store.seed_if_empty(&seed).await? {
                tracing::info!("Loaded showroom seed data");
            }
            AppState::new(Arc::new(store), sse_tx)
        }
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

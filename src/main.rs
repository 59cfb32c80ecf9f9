use std::sync::Arc;

use anyhow::Context;
use northwind_api::config::{self, StoreBackend};
use northwind_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use northwind_api::{app, is_production, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    northwind_api::init_tracing("info");

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Northwind API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            if is_production!() {
                tracing::warn!("Memory store selected in production; data will not survive a restart");
            }
            Arc::new(MemoryStore::seeded())
        }
    };
    tracing::info!("Using {} store", store.backend_name());

    let app = app(AppState::new(store, config.api.page_size), config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Northwind API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

//! # Todo API Server
//!
//! Authenticated, owner-scoped todo REST API.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) DATABASE_URL=postgres://localhost/todos cargo run -p todo-api
//! ```
//!
//! Without `DATABASE_URL` the server keeps data in memory.

use std::sync::Arc;

use todo_api::{
    app::{build_router, AppState},
    config::Config,
};
use todo_shared::{
    db::{migrations, pool},
    store::{MemoryStore, PgStore, Store},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "todo_api=debug,todo_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    let Some(database) = &config.database else {
        tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let pool_config = pool::PoolConfig {
        max_connections: database.max_connections,
        ..pool::PoolConfig::new(database.url.clone())
    };

    if !config.api.production {
        migrations::ensure_database_exists(&database.url).await?;
    }

    let pool = pool::create_pool(pool_config).await?;
    migrations::run_migrations(&pool).await?;

    Ok(Arc::new(PgStore::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG and LOG_FORMAT from it apply
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Todo API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend(), "Store ready");

    let address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

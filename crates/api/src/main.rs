use anyhow::{bail, Context, Result};
use persistence::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use std::sync::Arc;
use tracing::{info, warn};

use product_config_api::config::Config;
use product_config_api::{app, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!(
        "Starting product config service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let store = connect_store(&config).await?;

    let app = app::create_app(config.clone(), store);

    let addr = config.socket_addr().context("Invalid server address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn connect_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match config.store.backend.as_str() {
        "postgres" => {
            let pool = persistence::db::create_pool(&(&config.store).into())
                .await
                .context("Failed to connect to the document store")?;

            info!("Running database migrations...");
            persistence::db::run_migrations(&pool).await?;
            info!("Migrations completed");

            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
        "memory" => {
            warn!("Using the in-memory store; records are lost on restart");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
        other => bail!("Unknown store backend '{}'", other),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

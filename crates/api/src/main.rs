use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use persistence::repositories::PgUsageRecordStore;
use smart_home_analytics_api::{app, config, middleware, services::HttpDeviceDirectory};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!(
        "Starting Smart Home Analytics API v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let store = Arc::new(PgUsageRecordStore::new(pool));
    let directory = Arc::new(
        HttpDeviceDirectory::new(&config.device_registry)
            .context("Failed to build device registry client")?,
    );

    let addr = config.socket_addr().context("Invalid server address")?;
    let app = app::create_app(config, store, directory)?;

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

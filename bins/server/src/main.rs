//! ImageDock API Server
//!
//! Main entry point for the image upload and catalog service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imagedock_api::{AppState, create_router};
use imagedock_core::catalog::{CatalogService, CatalogSettings};
use imagedock_core::storage::{StorageProvider, StorageService};
use imagedock_db::{ImageRepository, connect, ensure_schema};
use imagedock_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imagedock=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    ensure_schema(&db)
        .await
        .context("Failed to create images table")?;

    let provider = StorageProvider::from(&config.storage);
    let store = StorageService::from_provider(provider)
        .context("Failed to initialize object storage")?;
    info!(
        provider = store.provider_name(),
        bucket = %config.storage.bucket,
        upload_dir = %config.storage.upload_dir,
        "Object storage configured"
    );

    let catalog = CatalogService::new(
        Arc::new(store),
        Arc::new(ImageRepository::new(db)),
        CatalogSettings::new(
            config.storage.upload_dir.clone(),
            config.storage.public_url_base.clone(),
        ),
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        max_upload_bytes: config.server.max_upload_bytes,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - The `images` entity definition
//! - The metadata store behind the catalog's `ImageRepository` trait
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::ImageRepository;

use imagedock_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use migration::Migrator;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    db.ping().await?;

    info!(target_db = %config.display_target(), "Database connected");
    Ok(db)
}

/// Creates the `images` table if it does not exist.
///
/// Idempotent; safe to call on every start.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await?;
    info!("Images table created/verified");
    Ok(())
}

//! Shared configuration and error types for ImageDock.
//!
//! This crate provides common types used across all other crates:
//! - Environment-driven configuration
//! - The caller-facing error taxonomy

pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigError, DatabaseConfig, ServerConfig, StorageSettings};
pub use error::{AppError, AppResult};

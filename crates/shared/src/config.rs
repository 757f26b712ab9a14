//! Application configuration management.
//!
//! Settings come from the process environment (unprefixed variables such as
//! `S3_BUCKET` or `DATABASE_URL`), optionally layered over `config/default`
//! and `config/{RUN_MODE}` files.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Default form size ceiling: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),

    /// `DATABASE_URL` is not set.
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,

    /// `DATABASE_URL` is not a valid URL.
    #[error("failed to parse database URL: {0}")]
    InvalidDatabaseUrl(#[from] url::ParseError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Object storage configuration.
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Maximum accepted size of an upload form, in bytes.
    pub max_upload_bytes: usize,
}

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL, always carrying `sslmode=require`.
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Host and database name, safe to log.
    #[must_use]
    pub fn display_target(&self) -> String {
        Url::parse(&self.url).map_or_else(
            |_| "<invalid>".to_string(),
            |url| format!("{}{}", url.host_str().unwrap_or("localhost"), url.path()),
        )
    }
}

/// Object storage and public URL settings.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Target bucket name.
    pub bucket: String,
    /// Key prefix for uploaded objects.
    pub upload_dir: String,
    /// Base used to build public links; `None` when unset or empty.
    pub public_url_base: Option<String>,
    /// S3-compatible endpoint override.
    pub endpoint: Option<String>,
    /// S3 region.
    pub region: String,
    /// Static access key; ambient credentials are used when absent.
    pub access_key_id: Option<String>,
    /// Static secret key.
    pub secret_access_key: Option<String>,
    /// When set, objects go to this local directory instead of S3.
    pub local_root: Option<PathBuf>,
}

/// Flat view of the environment, one field per variable.
#[derive(Debug, Deserialize)]
struct EnvConfig {
    #[serde(default)]
    s3_bucket: String,
    #[serde(default)]
    upload_dir: String,
    public_url_base: Option<String>,
    database_url: Option<String>,
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    s3_endpoint: Option<String>,
    #[serde(default = "default_region")]
    s3_region: String,
    aws_access_key_id: Option<String>,
    aws_secret_access_key: Option<String>,
    local_storage_root: Option<PathBuf>,
    #[serde(default = "default_max_upload_bytes")]
    max_upload_bytes: usize,
    #[serde(default = "default_max_connections")]
    database_max_connections: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_max_connections() -> u32 {
    10
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read, `DATABASE_URL` is
    /// missing, or it cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let env: EnvConfig = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::default().ignore_empty(true))
            .build()?
            .try_deserialize()?;

        Self::try_from(env)
    }
}

impl TryFrom<EnvConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(env: EnvConfig) -> Result<Self, Self::Error> {
        let raw_url = non_empty(env.database_url).ok_or(ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            server: ServerConfig {
                host: env.host,
                port: env.port,
                max_upload_bytes: env.max_upload_bytes,
            },
            database: DatabaseConfig {
                url: require_tls(&raw_url)?,
                max_connections: env.database_max_connections,
            },
            storage: StorageSettings {
                bucket: env.s3_bucket,
                upload_dir: env.upload_dir,
                public_url_base: non_empty(env.public_url_base),
                endpoint: non_empty(env.s3_endpoint),
                region: env.s3_region,
                access_key_id: non_empty(env.aws_access_key_id),
                secret_access_key: non_empty(env.aws_secret_access_key),
                local_root: env.local_storage_root,
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Forces `sslmode=require` onto a database URL, replacing any existing
/// `sslmode` while keeping the other query parameters.
///
/// # Errors
///
/// Returns an error if `raw` is not a valid URL.
pub fn require_tls(raw: &str) -> Result<String, ConfigError> {
    let mut url = Url::parse(raw)?;
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "sslmode")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("sslmode", "require");

    Ok(url.into())
}

//! Storage configuration types.

use std::path::PathBuf;

use imagedock_shared::StorageSettings;
use serde::{Deserialize, Serialize};

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: AWS S3, Cloudflare R2, MinIO, DigitalOcean Spaces
    S3 {
        /// Endpoint override; the AWS endpoint for `region` when absent.
        endpoint: Option<String>,
        /// S3 bucket name.
        bucket: String,
        /// Static access key ID; ambient AWS credentials when absent.
        access_key_id: Option<String>,
        /// Static secret access key.
        secret_access_key: Option<String>,
        /// AWS region.
        region: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory, lost on exit
    Memory,
}

impl StorageProvider {
    /// Create S3-compatible provider with ambient credentials.
    #[must_use]
    pub fn s3(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self::S3 {
            endpoint: None,
            bucket: bucket.into(),
            access_key_id: None,
            secret_access_key: None,
            region: region.into(),
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }

    /// Get the bucket name recorded alongside each object.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::LocalFs { root } => root.to_str().unwrap_or("local"),
            Self::Memory => "memory",
        }
    }
}

impl From<&StorageSettings> for StorageProvider {
    fn from(settings: &StorageSettings) -> Self {
        if let Some(root) = &settings.local_root {
            return Self::local_fs(root.clone());
        }

        Self::S3 {
            endpoint: settings.endpoint.clone(),
            bucket: settings.bucket.clone(),
            access_key_id: settings.access_key_id.clone(),
            secret_access_key: settings.secret_access_key.clone(),
            region: settings.region.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> StorageSettings {
        StorageSettings {
            bucket: "product-images".to_string(),
            upload_dir: "uploads".to_string(),
            public_url_base: Some("https://cdn.example.com".to_string()),
            endpoint: Some("https://minio.local:9000".to_string()),
            region: "eu-west-1".to_string(),
            access_key_id: Some("AKIA".to_string()),
            secret_access_key: Some("secret".to_string()),
            local_root: None,
        }
    }

    #[test]
    fn test_storage_provider_s3() {
        let provider = StorageProvider::s3("product-images", "us-east-1");
        assert_eq!(provider.name(), "s3");
        assert_eq!(provider.bucket(), "product-images");
    }

    #[test]
    fn test_storage_provider_local() {
        let provider = StorageProvider::local_fs("./storage");
        assert_eq!(provider.name(), "local");
        assert_eq!(provider.bucket(), "./storage");
    }

    #[test]
    fn test_storage_provider_memory() {
        assert_eq!(StorageProvider::Memory.name(), "memory");
    }

    #[test]
    fn test_from_settings_s3() {
        let provider = StorageProvider::from(&settings());
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                region,
                ..
            } => {
                assert_eq!(endpoint.as_deref(), Some("https://minio.local:9000"));
                assert_eq!(bucket, "product-images");
                assert_eq!(region, "eu-west-1");
            }
            other => panic!("expected S3 provider, got {other:?}"),
        }
    }

    #[test]
    fn test_from_settings_prefers_local_root() {
        let mut settings = settings();
        settings.local_root = Some(PathBuf::from("/var/lib/imagedock"));

        let provider = StorageProvider::from(&settings);
        assert_eq!(provider.name(), "local");
        assert_eq!(provider.bucket(), "/var/lib/imagedock");
    }
}

//! Catalog types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A cataloged image as persisted by the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// Store-generated identifier.
    pub id: i32,
    /// Filename as supplied by the client.
    pub filename: String,
    /// Object key in the bucket.
    pub storage_key: String,
    /// Bucket the object was written to.
    pub bucket: String,
    /// Public URL of the object.
    pub url: Option<String>,
    /// Insert time assigned by the store.
    pub uploaded_at: Option<DateTime<Utc>>,
    /// Caller-supplied category.
    pub category: String,
    /// Caller-supplied sub-category.
    pub sub_category: String,
    /// Caller-supplied display name.
    pub name: String,
}

/// Input for creating an image record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImageRecord {
    /// Filename as supplied by the client.
    pub filename: String,
    /// Object key in the bucket.
    pub storage_key: String,
    /// Bucket the object was written to.
    pub bucket: String,
    /// Public URL of the object.
    pub url: String,
    /// Caller-supplied category.
    pub category: String,
    /// Caller-supplied sub-category.
    pub sub_category: String,
    /// Caller-supplied display name.
    pub name: String,
}

/// A parsed upload form.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    /// Client filename of the `image` part.
    pub filename: String,
    /// Content type of the `image` part, if sent.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
    /// `category` field.
    pub category: String,
    /// `sub_category` field.
    pub sub_category: String,
    /// `product_name` field. Accepted for form compatibility, never persisted.
    pub product_name: String,
    /// `name` field.
    pub name: String,
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// Object key the file was written under.
    pub storage_key: String,
    /// Public URL of the stored object.
    pub url: String,
    /// Catalog row, `None` when the metadata insert failed.
    pub record: Option<ImageRecord>,
}

/// Settings the workflow needs per request.
#[derive(Debug, Clone, Default)]
pub struct CatalogSettings {
    /// Key prefix for uploaded objects.
    pub upload_dir: String,
    /// Base for public links; uploads and listings fail without it.
    pub public_url_base: Option<String>,
}

impl CatalogSettings {
    /// Create settings from a prefix and optional public base.
    #[must_use]
    pub fn new(upload_dir: impl Into<String>, public_url_base: Option<String>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            public_url_base: public_url_base.filter(|base| !base.is_empty()),
        }
    }
}

//! Catalog service implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use super::error::CatalogError;
use super::keys::{list_prefix, public_url, storage_key};
use super::types::{CatalogSettings, ImageRecord, NewImageRecord, UploadForm, UploadReceipt};
use crate::storage::ObjectStore;

/// Repository trait for image metadata persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Insert a new image record.
    async fn insert(&self, record: NewImageRecord) -> Result<ImageRecord, CatalogError>;

    /// Find an image record by ID.
    async fn find_by_id(&self, id: i32) -> Result<Option<ImageRecord>, CatalogError>;

    /// List all image records, newest first.
    async fn list_all(&self) -> Result<Vec<ImageRecord>, CatalogError>;
}

/// Upload and list workflows over an object store and a metadata store.
pub struct CatalogService {
    store: Arc<dyn ObjectStore>,
    repo: Arc<dyn ImageRepository>,
    settings: CatalogSettings,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(
        store: Arc<dyn ObjectStore>,
        repo: Arc<dyn ImageRepository>,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            store,
            repo,
            settings,
        }
    }

    /// Store an uploaded file and catalog it.
    ///
    /// The object write and the metadata insert are not transactional: once
    /// the write succeeds the upload is reported as successful, and a failed
    /// insert only shows up as `record: None` on the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The object store write fails (nothing is cataloged)
    /// - The public URL base is not configured (the object stays orphaned)
    pub async fn upload(&self, form: UploadForm) -> Result<UploadReceipt, CatalogError> {
        let key = storage_key(&self.settings.upload_dir, &form.filename);

        self.store
            .put_object(&key, form.data, form.content_type.as_deref())
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Object store upload failed");
                CatalogError::UploadFailed(e)
            })?;

        let url = public_url(self.public_url_base()?, &key);

        if !form.product_name.is_empty() {
            debug!(product_name = %form.product_name, "product_name is accepted but not persisted");
        }

        let record = self
            .finalize_upload(NewImageRecord {
                filename: form.filename,
                storage_key: key.clone(),
                bucket: self.store.bucket().to_string(),
                url: url.clone(),
                category: form.category,
                sub_category: form.sub_category,
                name: form.name,
            })
            .await;

        Ok(UploadReceipt {
            storage_key: key,
            url,
            record,
        })
    }

    /// Catalog an object that is already durable in the store.
    ///
    /// Best effort: a failed insert is logged and yields `None`. The object
    /// is not removed.
    pub async fn finalize_upload(&self, record: NewImageRecord) -> Option<ImageRecord> {
        let key = record.storage_key.clone();

        match self.repo.insert(record).await {
            Ok(stored) => {
                info!(
                    id = stored.id,
                    key = %stored.storage_key,
                    category = %stored.category,
                    sub_category = %stored.sub_category,
                    name = %stored.name,
                    "Image record stored"
                );
                Some(stored)
            }
            Err(e) => {
                error!(key = %key, error = %e, "Failed to store image in database");
                None
            }
        }
    }

    /// Public URLs of every object under the upload prefix, in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails or the public URL base is missing.
    pub async fn list_urls(&self) -> Result<Vec<String>, CatalogError> {
        let prefix = list_prefix(&self.settings.upload_dir);

        let keys = self.store.list_objects(&prefix).await.map_err(|e| {
            error!(prefix = %prefix, error = %e, "Failed to list objects");
            CatalogError::ListFailed(e)
        })?;

        let base = self.public_url_base()?;
        Ok(keys.iter().map(|key| public_url(base, key)).collect())
    }

    /// List all cataloged records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata store fails.
    pub async fn list_records(&self) -> Result<Vec<ImageRecord>, CatalogError> {
        self.repo.list_all().await
    }

    /// Get a cataloged record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or the metadata store fails.
    pub async fn get_record(&self, id: i32) -> Result<ImageRecord, CatalogError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    fn public_url_base(&self) -> Result<&str, CatalogError> {
        self.settings.public_url_base.as_deref().ok_or_else(|| {
            error!("PUBLIC_URL_BASE not configured");
            CatalogError::MissingPublicUrlBase
        })
    }
}

//! Image repository for database operations.
//!
//! Implements the catalog's metadata store using SeaORM.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entities::images;
use imagedock_core::catalog::{
    CatalogError, ImageRecord, ImageRepository as ImageRepoTrait, NewImageRecord,
};

/// Image repository implementation.
#[derive(Debug, Clone)]
pub struct ImageRepository {
    db: DatabaseConnection,
}

impl ImageRepository {
    /// Create a new image repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ImageRepoTrait for ImageRepository {
    async fn insert(&self, record: NewImageRecord) -> Result<ImageRecord, CatalogError> {
        // id and uploaded_at come from column defaults
        let active_model = images::ActiveModel {
            filename: Set(record.filename),
            s3_key: Set(record.storage_key),
            s3_bucket: Set(record.bucket),
            url: Set(Some(record.url)),
            category: Set(record.category),
            sub_category: Set(record.sub_category),
            name: Set(record.name),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| CatalogError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ImageRecord>, CatalogError> {
        let model = images::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CatalogError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list_all(&self) -> Result<Vec<ImageRecord>, CatalogError> {
        let models = images::Entity::find()
            .order_by_desc(images::Column::UploadedAt)
            .order_by_desc(images::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CatalogError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }
}

/// Convert database model to domain model.
///
/// `uploaded_at` is a zone-less `TIMESTAMP`; it is read as UTC.
fn to_domain(model: images::Model) -> ImageRecord {
    ImageRecord {
        id: model.id,
        filename: model.filename,
        storage_key: model.s3_key,
        bucket: model.s3_bucket,
        url: model.url,
        uploaded_at: model.uploaded_at.map(as_utc),
        category: model.category,
        sub_category: model.sub_category,
        name: model.name,
    }
}

fn as_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

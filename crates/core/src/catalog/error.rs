//! Catalog error types.

use imagedock_shared::AppError;
use thiserror::Error;

use crate::storage::StorageError;

/// Catalog operation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Writing the object failed; nothing was cataloged.
    #[error("upload failed: {0}")]
    UploadFailed(#[source] StorageError),

    /// Listing the upload prefix failed.
    #[error("listing failed: {0}")]
    ListFailed(#[source] StorageError),

    /// `PUBLIC_URL_BASE` is not configured.
    #[error("public URL base is not configured")]
    MissingPublicUrlBase,

    /// Image record not found.
    #[error("image not found: {0}")]
    NotFound(i32),

    /// Metadata store operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl CatalogError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UploadFailed(_) => Self::UploadFailed,
            CatalogError::ListFailed(_) => Self::ListFailed,
            CatalogError::MissingPublicUrlBase => Self::Configuration,
            CatalogError::NotFound(id) => Self::NotFound(format!("image {id}")),
            CatalogError::Repository(_) => Self::Database,
        }
    }
}

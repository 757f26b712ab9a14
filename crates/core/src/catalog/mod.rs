//! Image catalog workflows.
//!
//! This module provides the upload and list logic:
//! - Storage key and public URL derivation
//! - Object write followed by best-effort metadata insert
//! - Projection of stored keys to public URLs
//! - Read access to cataloged records

mod error;
mod keys;
mod service;
mod types;

pub use error::CatalogError;
pub use keys::{list_prefix, public_url, storage_key};
pub use service::{CatalogService, ImageRepository};
pub use types::{CatalogSettings, ImageRecord, NewImageRecord, UploadForm, UploadReceipt};

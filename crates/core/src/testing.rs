//! In-memory object and metadata stores for tests.
//!
//! Compiled for this crate's tests and for dependents that enable the
//! `test-support` feature.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;

use crate::catalog::{CatalogError, ImageRecord, ImageRepository, NewImageRecord};
use crate::storage::{ObjectStore, StorageError};

/// Bucket name reported by [`FakeStore`].
pub const FAKE_BUCKET: &str = "product-images";

/// Object store keeping objects in a sorted map.
#[derive(Debug, Default)]
pub struct FakeStore {
    /// Stored objects by key.
    pub objects: Mutex<BTreeMap<String, Bytes>>,
    /// Make `put_object` fail.
    pub fail_writes: bool,
    /// Make `list_objects` fail.
    pub fail_lists: bool,
}

impl FakeStore {
    /// Store holding empty objects under `keys`.
    #[must_use]
    pub fn with_keys(keys: &[&str]) -> Self {
        let store = Self::default();
        store
            .objects()
            .extend(keys.iter().map(|key| ((*key).to_string(), Bytes::new())));
        store
    }

    /// Store whose writes and listings both fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            fail_lists: true,
            ..Self::default()
        }
    }

    /// Stored keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.objects().keys().cloned().collect()
    }

    /// Bytes stored under `key`.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.objects().get(key).cloned()
    }

    fn objects(&self) -> MutexGuard<'_, BTreeMap<String, Bytes>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        _content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::operation("bucket unreachable"));
        }
        self.objects().insert(key.to_string(), data);
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        if self.fail_lists {
            return Err(StorageError::operation("bucket unreachable"));
        }
        Ok(self
            .objects()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn bucket(&self) -> &str {
        FAKE_BUCKET
    }
}

/// Metadata store keeping rows in insertion order.
#[derive(Debug, Default)]
pub struct FakeRepo {
    /// Stored rows, oldest first.
    pub rows: Mutex<Vec<ImageRecord>>,
    /// Make every operation fail.
    pub fail: bool,
}

impl FakeRepo {
    /// Repository whose every operation fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of the stored rows, oldest first.
    pub fn records(&self) -> Vec<ImageRecord> {
        self.rows().clone()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<ImageRecord>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.fail {
            return Err(CatalogError::repository("connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageRepository for FakeRepo {
    async fn insert(&self, record: NewImageRecord) -> Result<ImageRecord, CatalogError> {
        self.check()?;

        let mut rows = self.rows();
        let id = i32::try_from(rows.len() + 1)
            .map_err(|_| CatalogError::repository("id overflow"))?;
        let stored = ImageRecord {
            id,
            filename: record.filename,
            storage_key: record.storage_key,
            bucket: record.bucket,
            url: Some(record.url),
            uploaded_at: Some(chrono::Utc::now()),
            category: record.category,
            sub_category: record.sub_category,
            name: record.name,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ImageRecord>, CatalogError> {
        self.check()?;
        Ok(self.rows().iter().find(|r| r.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<ImageRecord>, CatalogError> {
        self.check()?;
        Ok(self.rows().iter().rev().cloned().collect())
    }
}

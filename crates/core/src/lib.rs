//! Core upload and catalog logic for ImageDock.
//!
//! This crate contains the workflow with ZERO web or database dependencies.
//! The object store and the metadata store are reached through the
//! [`storage::ObjectStore`] and [`catalog::ImageRepository`] traits.
//!
//! # Modules
//!
//! - `storage` - Object storage via Apache OpenDAL
//! - `catalog` - Upload and list workflows, storage key derivation
//! - `testing` - In-memory stores (`test-support` feature)

pub mod catalog;
pub mod storage;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

//! In-memory stores and request helpers for router tests.

use std::sync::Arc;

use axum::Router;
use imagedock_core::catalog::{CatalogService, CatalogSettings};
pub use imagedock_core::testing::{FakeRepo, FakeStore};

use crate::{AppState, create_router};

pub const BASE: &str = "https://cdn.example.com";
pub const BOUNDARY: &str = "imagedock-test-boundary";

/// Router over the given fakes with `UPLOAD_DIR=uploads`.
pub fn app(store: Arc<FakeStore>, repo: Arc<FakeRepo>, base: Option<&str>) -> Router {
    app_with_limit(store, repo, base, 10 * 1024 * 1024)
}

pub fn app_with_limit(
    store: Arc<FakeStore>,
    repo: Arc<FakeRepo>,
    base: Option<&str>,
    max_upload_bytes: usize,
) -> Router {
    let catalog = CatalogService::new(
        store,
        repo,
        CatalogSettings::new("uploads", base.map(String::from)),
    );

    create_router(AppState {
        catalog: Arc::new(catalog),
        max_upload_bytes,
    })
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        data: &'a [u8],
    },
}

/// Encode parts as a `multipart/form-data` body delimited by [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                filename,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

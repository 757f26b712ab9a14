//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod images;
pub mod records;

/// Creates the API router with all routes.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(images::routes(max_upload_bytes))
        .merge(records::routes())
}

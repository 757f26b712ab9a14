//! Read-only catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use imagedock_core::catalog::ImageRecord;

use crate::{AppState, error::ApiError};

/// Creates catalog record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/records", get(list_records))
        .route("/records/{id}", get(get_record))
}

/// GET `/records`
/// Newest first.
async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<ImageRecord>>, ApiError> {
    let records = state.catalog.list_records().await?;
    Ok(Json(records))
}

/// GET `/records/{id}`
async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ImageRecord>, ApiError> {
    let record = state.catalog.get_record(id).await?;
    Ok(Json(record))
}

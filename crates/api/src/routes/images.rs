//! Image upload and listing routes.

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{AppState, error::ApiError};
use imagedock_core::catalog::UploadForm;
use imagedock_shared::AppError;

const PARSE_FAILED: &str = "Failed to parse form";
const FILE_NOT_FOUND: &str = "File not found";

/// Creates the upload and listing routes.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload_image)
                .options(preflight)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/images", get(list_images))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always "Upload successful".
    pub message: &'static str,
    /// Public URL of the stored image.
    pub url: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/upload`
/// Store the `image` part and catalog it.
async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let multipart = multipart.map_err(|e| {
        warn!(error = %e, "Rejected upload body");
        AppError::BadRequest(PARSE_FAILED.to_string())
    })?;

    let form = read_upload_form(multipart).await?;
    let receipt = state.catalog.upload(form).await?;

    info!(
        key = %receipt.storage_key,
        url = %receipt.url,
        cataloged = receipt.record.is_some(),
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        message: "Upload successful",
        url: receipt.url,
    }))
}

/// OPTIONS `/upload`
/// Bare success for preflight requests the CORS layer does not answer.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    AppError::MethodNotAllowed.into()
}

/// GET `/images`
/// Public URLs of every stored object under the upload prefix.
async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let urls = state.catalog.list_urls().await?;
    Ok(Json(urls))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Read the whole form, then require a file part named `image`.
///
/// Parts named `image` without a filename, or with an empty one as browsers
/// send for an unselected file input, are not files and are ignored, as are
/// unknown fields. The first `image` file wins.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    let mut has_image = false;

    while let Some(field) = multipart.next_field().await.map_err(parse_failure)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "image" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(parse_failure)?;

                if let Some(filename) = filename.filter(|f| !f.is_empty())
                    && !has_image
                {
                    form.filename = filename;
                    form.content_type = content_type;
                    form.data = data;
                    has_image = true;
                }
            }
            "category" => form.category = field.text().await.map_err(parse_failure)?,
            "sub_category" => form.sub_category = field.text().await.map_err(parse_failure)?,
            "product_name" => form.product_name = field.text().await.map_err(parse_failure)?,
            "name" => form.name = field.text().await.map_err(parse_failure)?,
            _ => {}
        }
    }

    if !has_image {
        return Err(AppError::BadRequest(FILE_NOT_FOUND.to_string()));
    }

    Ok(form)
}

#[allow(clippy::needless_pass_by_value)]
fn parse_failure(err: MultipartError) -> AppError {
    warn!(error = %err, "Failed to parse upload form");
    AppError::BadRequest(PARSE_FAILED.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, header},
    };
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{
        BASE, FakeRepo, FakeStore, Part, app, app_with_limit, multipart_body,
        multipart_content_type,
    };

    fn photo_parts() -> Vec<Part<'static>> {
        vec![
            Part::File {
                name: "image",
                filename: "My Photo.png",
                data: b"\x89PNG\r\n\x1a\n",
            },
            Part::Text("category", "shoes"),
            Part::Text("sub_category", "running"),
            Part::Text("product_name", "Air Max 90"),
            Part::Text("name", "AirMax"),
        ]
    }

    fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, multipart_content_type())
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    fn json(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_upload_scenario() {
        let store = Arc::new(FakeStore::default());
        let repo = Arc::new(FakeRepo::default());
        let app = app(store.clone(), repo.clone(), Some(BASE));

        let (status, body) = send(app, upload_request(&photo_parts())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json(&body),
            serde_json::json!({
                "message": "Upload successful",
                "url": "https://cdn.example.com/uploads/My_Photo.png"
            })
        );
        assert_eq!(store.keys(), vec!["uploads/My_Photo.png"]);
        assert_eq!(
            store.get("uploads/My_Photo.png").unwrap().as_ref(),
            b"\x89PNG\r\n\x1a\n"
        );

        let rows = repo.records();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].filename, "My Photo.png");
        assert_eq!(rows[0].storage_key, "uploads/My_Photo.png");
        assert_eq!(rows[0].category, "shoes");
        assert_eq!(rows[0].sub_category, "running");
        assert_eq!(rows[0].name, "AirMax");
    }

    #[tokio::test]
    async fn test_upload_missing_image_is_400() {
        let store = Arc::new(FakeStore::default());
        let repo = Arc::new(FakeRepo::default());
        let app = app(store.clone(), repo.clone(), Some(BASE));

        let (status, body) = send(
            app,
            upload_request(&[Part::Text("category", "shoes"), Part::Text("name", "AirMax")]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["message"], FILE_NOT_FOUND);
        assert!(store.keys().is_empty());
        assert!(repo.records().is_empty());
    }

    #[tokio::test]
    async fn test_upload_image_text_field_is_not_a_file() {
        let store = Arc::new(FakeStore::default());
        let app = app(store.clone(), Arc::new(FakeRepo::default()), Some(BASE));

        let (status, body) = send(app, upload_request(&[Part::Text("image", "not a file")])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["message"], FILE_NOT_FOUND);
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_upload_unselected_file_input_is_400() {
        let store = Arc::new(FakeStore::default());
        let repo = Arc::new(FakeRepo::default());
        let app = app(store.clone(), repo.clone(), Some(BASE));

        let (status, body) = send(
            app,
            upload_request(&[
                Part::File {
                    name: "image",
                    filename: "",
                    data: b"",
                },
                Part::Text("category", "shoes"),
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["message"], FILE_NOT_FOUND);
        assert!(store.keys().is_empty());
        assert!(repo.records().is_empty());
    }

    #[tokio::test]
    async fn test_upload_skips_empty_filename_before_real_file() {
        let store = Arc::new(FakeStore::default());
        let app = app(store.clone(), Arc::new(FakeRepo::default()), Some(BASE));

        let (status, body) = send(
            app,
            upload_request(&[
                Part::File {
                    name: "image",
                    filename: "",
                    data: b"",
                },
                Part::File {
                    name: "image",
                    filename: "shoe.png",
                    data: b"png",
                },
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["url"], "https://cdn.example.com/uploads/shoe.png");
        assert_eq!(store.keys(), vec!["uploads/shoe.png"]);
    }

    #[tokio::test]
    async fn test_upload_not_multipart_is_400() {
        let app = app(
            Arc::new(FakeStore::default()),
            Arc::new(FakeRepo::default()),
            Some(BASE),
        );

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"image":"x"}"#))
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["message"], PARSE_FAILED);
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_400() {
        let store = Arc::new(FakeStore::default());
        let app = app_with_limit(store.clone(), Arc::new(FakeRepo::default()), Some(BASE), 256);

        let big = vec![0u8; 4096];
        let (status, body) = send(
            app,
            upload_request(&[Part::File {
                name: "image",
                filename: "big.png",
                data: &big,
            }]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["message"], PARSE_FAILED);
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_upload_metadata_failure_still_200() {
        let repo = Arc::new(FakeRepo::failing());
        let app = app(Arc::new(FakeStore::default()), repo, Some(BASE));

        let (status, body) = send(app, upload_request(&photo_parts())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json(&body)["url"],
            "https://cdn.example.com/uploads/My_Photo.png"
        );
    }

    #[tokio::test]
    async fn test_upload_store_failure_is_500() {
        let store = Arc::new(FakeStore::failing());
        let repo = Arc::new(FakeRepo::default());
        let app = app(store, repo.clone(), Some(BASE));

        let (status, body) = send(app, upload_request(&photo_parts())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["message"], "Upload failed");
        assert!(repo.records().is_empty());
    }

    #[tokio::test]
    async fn test_upload_without_base_is_500() {
        let store = Arc::new(FakeStore::default());
        let repo = Arc::new(FakeRepo::default());
        let app = app(store.clone(), repo.clone(), None);

        let (status, body) = send(app, upload_request(&photo_parts())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json = json(&body);
        assert_eq!(json["message"], "Server configuration error");
        assert!(json.get("url").is_none());
        // The object write already happened.
        assert_eq!(store.keys(), vec!["uploads/My_Photo.png"]);
        assert!(repo.records().is_empty());
    }

    #[rstest]
    #[case::get("GET")]
    #[case::put("PUT")]
    #[case::delete("DELETE")]
    #[tokio::test]
    async fn test_upload_wrong_method_is_405(#[case] method: &str) {
        let app = app(
            Arc::new(FakeStore::default()),
            Arc::new(FakeRepo::default()),
            Some(BASE),
        );

        let request = Request::builder()
            .method(method)
            .uri("/upload")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json(&body)["error"], "method_not_allowed");
    }

    #[tokio::test]
    async fn test_options_upload_is_empty_200() {
        // No public base: OPTIONS does not depend on configuration.
        let app = app(
            Arc::new(FakeStore::default()),
            Arc::new(FakeRepo::default()),
            None,
        );

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/upload")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = app(
            Arc::new(FakeStore::default()),
            Arc::new(FakeRepo::default()),
            None,
        );

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/upload")
            .header(header::ORIGIN, "https://shop.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(
                header::ACCESS_CONTROL_REQUEST_HEADERS,
                "content-type,authorization",
            )
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap();
        for method in ["GET", "POST", "OPTIONS"] {
            assert!(methods.contains(method), "missing {method} in {methods}");
        }
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        for name in ["content-type", "authorization"] {
            assert!(allowed.contains(name), "missing {name} in {allowed}");
        }
    }

    #[tokio::test]
    async fn test_cors_header_on_error_response() {
        let app = app(
            Arc::new(FakeStore::default()),
            Arc::new(FakeRepo::default()),
            None,
        );

        let request = Request::builder()
            .uri("/images")
            .header(header::ORIGIN, "https://shop.example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_list_images_reflects_store() {
        let store = Arc::new(FakeStore::with_keys(&[
            "uploads/a.png",
            "uploads/b.png",
            "other/c.png",
        ]));
        // No rows at all: the listing only reads the object store.
        let app = app(store, Arc::new(FakeRepo::default()), Some(BASE));

        let request = Request::builder().uri("/images").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json(&body),
            serde_json::json!([
                "https://cdn.example.com/uploads/a.png",
                "https://cdn.example.com/uploads/b.png"
            ])
        );
    }

    #[tokio::test]
    async fn test_list_images_empty() {
        let app = app(
            Arc::new(FakeStore::default()),
            Arc::new(FakeRepo::default()),
            Some(BASE),
        );

        let request = Request::builder().uri("/images").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_list_images_without_base_is_500() {
        let store = Arc::new(FakeStore::with_keys(&["uploads/a.png"]));
        let app = app(store, Arc::new(FakeRepo::default()), None);

        let request = Request::builder().uri("/images").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["error"], "config_error");
    }

    #[tokio::test]
    async fn test_list_images_store_failure_is_500() {
        let store = Arc::new(FakeStore::failing());
        let app = app(store, Arc::new(FakeRepo::default()), Some(BASE));

        let request = Request::builder().uri("/images").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["error"], "list_failed");
    }
}

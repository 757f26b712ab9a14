//! Application-wide error types.
//!
//! The `Display` text of each variant is the short message returned to the
//! caller; internal details are logged where the error is raised.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// The route exists but not for this HTTP method.
    #[error("Invalid method")]
    MethodNotAllowed,

    /// The request body or parameters are unusable.
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The object store rejected a write.
    #[error("Upload failed")]
    UploadFailed,

    /// The object store could not be listed.
    #[error("Failed to list images")]
    ListFailed,

    /// Required configuration is missing at request time.
    #[error("Server configuration error")]
    Configuration,

    /// Database error.
    #[error("Database error")]
    Database,
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::UploadFailed | Self::ListFailed | Self::Configuration | Self::Database => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method_not_allowed",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::UploadFailed => "upload_failed",
            Self::ListFailed => "list_failed",
            Self::Configuration => "config_error",
            Self::Database => "database_error",
        }
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use mktlab_core::error::CoreError;

use crate::backend::BackendError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mktlab_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The page requires a login; the response carries the login link.
    #[error("{message}")]
    LoginRequired {
        message: String,
        location: &'static str,
    },

    /// The remote backend could not be reached.
    #[error("Error llamando al backend: {0}")]
    Backend(#[from] BackendError),

    /// A test-suite invocation failed in a way worth showing the admin.
    #[error("{0}")]
    RunFailed(String),

    /// An internal error with a human-readable message (logged, not shown).
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound(msg) => (
                    StatusCode::NOT_FOUND,
                    json!({ "error": msg, "code": "NOT_FOUND" }),
                ),
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    json!({ "error": msg, "code": "UNAUTHORIZED" }),
                ),
                CoreError::Forbidden(msg) => (
                    StatusCode::FORBIDDEN,
                    json!({ "error": msg, "code": "FORBIDDEN" }),
                ),
            },

            // The login gate carries the navigation link on top of the
            // common envelope.
            AppError::LoginRequired { message, location } => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": message, "code": "LOGIN_REQUIRED", "login_url": location }),
            ),

            AppError::Backend(err) => {
                tracing::error!(error = %err, "Backend call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": self.to_string(), "code": "BACKEND_ERROR" }),
                )
            }

            AppError::RunFailed(msg) => {
                tracing::error!(error = %msg, "Test run failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": msg, "code": "TEST_RUN_ERROR" }),
                )
            }

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal error occurred", "code": "INTERNAL_ERROR" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

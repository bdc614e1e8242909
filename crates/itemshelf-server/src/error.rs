//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`itemshelf_core::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: itemshelf_core::Error,
}

impl AppError {
    pub fn new(inner: itemshelf_core::Error) -> Self {
        Self { inner }
    }
}

impl From<itemshelf_core::Error> for AppError {
    fn from(e: itemshelf_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let code = match &self.inner {
            itemshelf_core::Error::NotFound { .. } => "not_found",
            itemshelf_core::Error::Validation(_) => "validation_error",
            itemshelf_core::Error::PayloadTooLarge(_) => "payload_too_large",
            itemshelf_core::Error::Database { .. } => "database_error",
            itemshelf_core::Error::Io { .. } => "io_error",
            itemshelf_core::Error::Json { .. } => "json_error",
            itemshelf_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.to_string(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemshelf_core::Error;

    #[test]
    fn not_found_produces_404() {
        let response = AppError::new(Error::not_found("item", 3)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_produces_400() {
        let response = AppError::new(Error::validation("name is required")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn payload_too_large_produces_413() {
        let response = AppError::new(Error::PayloadTooLarge("limit".into())).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn io_produces_500() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let response = AppError::from(Error::from(io)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

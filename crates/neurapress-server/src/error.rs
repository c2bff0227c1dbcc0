//! Error types for the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use neurapress_core::IntegrationError;
use serde::Serialize;
use tracing::warn;

/// Request-level errors, rendered as `{message, code}` with the classified status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Rendered content is empty")]
    EmptyContent,

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, Option<&str>) {
        match self {
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, Some("VALIDATION_FAILED")),
            ApiError::EmptyContent => (StatusCode::UNPROCESSABLE_ENTITY, Some("EMPTY_CONTENT")),
            ApiError::InvalidJson(_) => (StatusCode::BAD_REQUEST, Some("INVALID_JSON")),
            ApiError::Integration(e) => (
                StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                e.code(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            code: Option<&'a str>,
        }

        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            warn!("Request failed with {}: {}", status, self);
        }

        let body = ErrorBody {
            message: self.to_string(),
            code,
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_status_passes_through() {
        let err = ApiError::from(IntegrationError::Authorization {
            status: 403,
            message: "Forbidden".to_string(),
            code: None,
        });
        assert_eq!(err.status_and_code(), (StatusCode::FORBIDDEN, None));

        let err = ApiError::from(IntegrationError::Remote {
            status: 42,
            message: "odd".to_string(),
            code: None,
        });
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_request_errors() {
        assert_eq!(
            ApiError::Validation("path is required").status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, Some("VALIDATION_FAILED"))
        );
        assert_eq!(
            ApiError::EmptyContent.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, Some("EMPTY_CONTENT"))
        );
    }
}

//! API error handling
//!
//! Every failure maps to the `{statusCode, message}` envelope, where
//! `statusCode` doubles as the HTTP status. Authentication and authorization
//! failures share 401 by design of the guard chain.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error taxonomy
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error")]
    Database,

    #[error("An internal error occurred")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body
    pub status_code: u16,
    /// Human-readable error message
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            status_code: err.status_code().as_u16(),
            // Internal details carry their payload outside Display, so the
            // body never leaks them.
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(detail = %detail, "Internal error");
        }
        let status = self.status_code();
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

impl From<cliniq_auth::AuthError> for ApiError {
    fn from(err: cliniq_auth::AuthError) -> Self {
        let message = err.client_message();
        match err.status_code() {
            400 => Self::Validation(message),
            401 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<cliniq_db::DbError> for ApiError {
    fn from(err: cliniq_db::DbError) -> Self {
        match err {
            cliniq_db::DbError::NotFound(msg) => Self::NotFound(msg),
            cliniq_db::DbError::Duplicate(msg) => Self::Conflict(msg),
            cliniq_db::DbError::InvalidInput(msg) => Self::Validation(msg),
            other => {
                tracing::error!(error = ?other, "Database error");
                Self::Database
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.as_ref().map(|m| m.as_ref()).unwrap_or("invalid")
                    )
                })
            })
            .collect();
        Self::Validation(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Conflict("x".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::Database.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_envelope_repeats_status() {
        let err = ApiError::NotFound("Admin not found".to_string());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.status_code, 404);
        assert_eq!(body.message, "Admin not found");
    }

    #[test]
    fn test_auth_error_mapping() {
        let err: ApiError = cliniq_auth::AuthError::Forbidden.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err: ApiError = cliniq_auth::AuthError::OtpMismatch.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = cliniq_db::DbError::Duplicate("phone".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: ApiError = cliniq_db::DbError::Connection("dsn".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

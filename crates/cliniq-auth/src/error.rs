//! Authentication error types
//!
//! Every authentication and authorization failure maps to one of these
//! variants. Authentication and authorization rejections share a single
//! status code (401) so callers cannot probe which guard step failed.

use thiserror::Error;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,

    /// Token is invalid (malformed, wrong signature, etc.)
    #[error("Invalid token")]
    InvalidToken,

    /// Bearer token missing from the Authorization header
    #[error("Token not found")]
    MissingToken,

    /// Role-scoped refresh cookie missing from the request
    #[error("Refresh token not found")]
    MissingRefreshCookie,

    /// Invalid credentials (password or phone/password pair)
    #[error("{0}")]
    InvalidCredentials(String),

    /// OTP challenge absent, expired, or the code does not match
    #[error("OTP is incorrect or expired")]
    OtpMismatch,

    /// Guard step rejected the caller
    #[error("Forbidden user")]
    Forbidden,

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    /// Password hashing failed
    #[error("Password hashing failed")]
    PasswordHashingFailed,

    /// Input failed validation
    #[error("{0}")]
    Validation(String),

    /// Subject not found
    #[error("{0}")]
    NotFound(String),

    /// State conflict (duplicate identifier, superadmin already exists)
    #[error("{0}")]
    Conflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not be exposed to clients)
    #[error("Internal error")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::WeakPassword(_) | Self::Validation(_) => 400,

            // 401 Unauthorized (authn and authz alike)
            Self::TokenExpired
            | Self::InvalidToken
            | Self::MissingToken
            | Self::MissingRefreshCookie
            | Self::InvalidCredentials(_)
            | Self::OtpMismatch
            | Self::Forbidden => 401,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 409 Conflict
            Self::Conflict(_) => 409,

            // 500 Internal Server Error
            Self::PasswordHashingFailed | Self::Config(_) | Self::Internal(_) => 500,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Get safe message for client (doesn't leak internal details)
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) | Self::Config(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::InvalidToken,
        }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(_: argon2::password_hash::Error) -> Self {
        Self::InvalidCredentials("Invalid password".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingToken.status_code(), 401);
        assert_eq!(AuthError::Forbidden.status_code(), 401);
        assert_eq!(AuthError::OtpMismatch.status_code(), 401);
        assert_eq!(AuthError::NotFound("x".to_string()).status_code(), 404);
        assert_eq!(AuthError::Conflict("x".to_string()).status_code(), 409);
        assert_eq!(AuthError::Internal("x".to_string()).status_code(), 500);
    }

    #[test]
    fn test_client_message_hides_internal_details() {
        let err = AuthError::Internal("connection string with password".to_string());
        assert!(!err.client_message().contains("password"));
    }

    #[test]
    fn test_forbidden_message() {
        assert_eq!(AuthError::Forbidden.to_string(), "Forbidden user");
    }
}

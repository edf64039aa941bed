//! Typed errors for the authentication core and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ApiResponse;

/// Errors produced by the authentication core.
///
/// These are returned as values, never thrown across the handler boundary;
/// the `IntoResponse` impl is the single place they become status codes.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Unified on purpose so responses do
    /// not disclose whether an account exists.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Malformed token, bad signature, expired, or wrong issuer/audience.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Cryptographically valid token that is not the currently whitelisted
    /// token for its subject.
    #[error("token has been revoked")]
    Revoked,

    /// The whitelist store could not be reached. Fail-closed: the request
    /// is rejected, never admitted.
    #[error("token registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// Malformed request body.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unexpected infrastructure failure (database, hashing).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable code carried in the error payload.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::Revoked => "REVOKED",
            AuthError::RegistryUnavailable(_) => "REGISTRY_UNAVAILABLE",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidToken(_) | AuthError::Revoked => StatusCode::UNAUTHORIZED,
            AuthError::RegistryUnavailable(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Infrastructure detail stays in the logs, not in the response body.
        let message = match &self {
            AuthError::RegistryUnavailable(detail) => {
                tracing::error!(%detail, "token registry unavailable");
                "service temporarily unavailable".to_string()
            }
            AuthError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ApiResponse::<()>::err(self.code(), message);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_error_taxonomy() {
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::InvalidToken("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Revoked.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::RegistryUnavailable("down".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AuthError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(AuthError::InvalidCredentials.code(), "INVALID_CREDENTIALS");
        assert_eq!(AuthError::Revoked.code(), "REVOKED");
    }
}

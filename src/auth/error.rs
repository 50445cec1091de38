//! Authentication error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::gateway::types::{ApiResponse, error_codes};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Invalid token format")]
    InvalidFormat,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Insufficient permissions for this operation")]
    Forbidden,

    #[error("Failed to issue token: {0}")]
    Issue(String),
}

impl AuthError {
    /// Get the API error code.
    pub fn code(&self) -> i32 {
        match self {
            AuthError::MissingToken => error_codes::MISSING_AUTH,
            AuthError::InvalidFormat | AuthError::InvalidToken => error_codes::AUTH_FAILED,
            AuthError::Forbidden => error_codes::PERMISSION_DENIED,
            AuthError::Issue(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Get HTTP status code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Issue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.code(), self.to_string());
        (self.http_status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status() {
        assert_eq!(AuthError::MissingToken.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Forbidden.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_into_response_status() {
        let response = AuthError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

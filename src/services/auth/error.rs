/*
 * Responsibility
 * - 認証・認可の失敗理由を型で表す
 * - 各 variant は HTTP status / machine code / description を持つ
 * - JSON への整形は境界 (IntoResponse) で行う
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::ErrorResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is missing")]
    AuthorizationHeaderMissing,
    #[error("Authorization header must be a bearer token")]
    InvalidHeaderFormat,
    #[error("Authorization malformed")]
    MalformedToken,
    #[error("Unable to find the appropriate key")]
    UnknownSigningKey,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token expired")]
    TokenExpired,
    #[error("Incorrect claims. Please, check the audience and issuer")]
    InvalidClaims,
    #[error("Permissions not included in JWT")]
    PermissionsClaimMissing,
    #[error("Permission not found")]
    PermissionNotFound,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::PermissionsClaimMissing => StatusCode::BAD_REQUEST,
            AuthError::PermissionNotFound => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Machine-readable code, stable across message wording changes.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AuthorizationHeaderMissing => "authorization_header_missing",
            AuthError::InvalidHeaderFormat => "invalid_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::UnknownSigningKey => "unknown_signing_key",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::PermissionsClaimMissing => "permissions_missing",
            AuthError::PermissionNotFound => "permission_not_found",
        }
    }

    /// An expired token can be fixed by re-authenticating; the other failures cannot.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::TokenExpired)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ErrorResponse::new(self.status_code(), self.to_string()).into_response()
    }
}

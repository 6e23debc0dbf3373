//! `Authorization: Bearer <token>` header parsing.

use axum::http::HeaderValue;

use super::AuthError;

const BEARER_SCHEME: &str = "Bearer";

/// Pulls the bare token out of an authorization header value.
///
/// The header must be exactly `Bearer <token>`: one space, case-sensitive scheme,
/// non-empty token. Nothing else is trimmed.
pub fn extract_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::AuthorizationHeaderMissing)?;
    let value = value.to_str().map_err(|_| AuthError::InvalidHeaderFormat)?;

    let mut parts = value.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthError::InvalidHeaderFormat);
    };

    if scheme != BEARER_SCHEME || token.is_empty() {
        return Err(AuthError::InvalidHeaderFormat);
    }

    Ok(token)
}

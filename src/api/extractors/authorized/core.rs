use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::services::auth::{AuthError, Claims};
use crate::state::AppState;

use super::types::RequiredScope;

/// Verified claims for a request that passed the auth gate with scope `S::SCOPE`.
///
/// Put it before any body extractor so that authorization runs first.
pub struct Authorized<S> {
    pub claims: Claims,
    _scope: PhantomData<S>,
}

impl<S> Authorized<S> {
    fn new(claims: Claims) -> Self {
        Self {
            claims,
            _scope: PhantomData,
        }
    }
}

impl<S> FromRequestParts<AppState> for Authorized<S>
where
    S: RequiredScope + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let scope = S::SCOPE;
        let authorization = parts.headers.get(header::AUTHORIZATION);

        match state.auth.authorize(authorization, scope).await {
            Ok(claims) => {
                tracing::debug!(%scope, sub = ?claims.sub, "request authorized");
                Ok(Self::new(claims))
            }
            Err(err) => {
                tracing::warn!(
                    %scope,
                    code = err.code(),
                    retryable = err.is_retryable(),
                    "authorization failed"
                );
                Err(err)
            }
        }
    }
}

impl<S> std::fmt::Debug for Authorized<S>
where
    S: RequiredScope,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorized")
            .field("scope", &S::SCOPE)
            .field("sub", &self.claims.sub)
            .finish()
    }
}

//! Auth gate: bearer extraction → token verification → scope check.
//!
//! Every stage short-circuits; a handler only ever sees claims that passed all three.

use std::future::Future;

use axum::http::HeaderValue;

use super::access_jwt::{Claims, TokenVerifier};
use super::scope::{Scope, check_permission};
use super::{AuthError, bearer};

#[derive(Debug)]
pub struct AuthGate {
    verifier: TokenVerifier,
}

impl AuthGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Runs the full chain for one request and returns the verified claims.
    pub async fn authorize(
        &self,
        authorization: Option<&HeaderValue>,
        scope: Scope,
    ) -> Result<Claims, AuthError> {
        let token = bearer::extract_token(authorization)?;
        let claims = self.verifier.verify(token).await?;
        check_permission(&claims, scope.as_str())?;
        Ok(claims)
    }

    /// Guarded invocation: `handler` runs with the claims only if `authorize` succeeded.
    pub async fn guard<F, Fut, T>(
        &self,
        authorization: Option<&HeaderValue>,
        scope: Scope,
        handler: F,
    ) -> Result<T, AuthError>
    where
        F: FnOnce(Claims) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(authorization, scope).await?;
        Ok(handler(claims).await)
    }
}

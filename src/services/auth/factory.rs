/// Factory: build the `AuthGate` (and its key cache) from application `Config`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::jwks::{HttpKeySetSource, JwksCache, KeySetError, RefreshPolicy};
use crate::services::auth::{AuthGate, TokenVerifier, VerifierSettings};

pub fn build_auth_gate(config: &AuthConfig) -> Result<(Arc<AuthGate>, Arc<JwksCache>), KeySetError> {
    let source = HttpKeySetSource::new(config.jwks_url.clone(), config.jwks_timeout)?;
    tracing::info!(jwks_url = %source.url(), "using issuer key set");

    let keys = Arc::new(JwksCache::new(
        Arc::new(source),
        RefreshPolicy {
            retries: config.jwks_fetch_retries,
            cooldown: config.jwks_refresh_cooldown,
        },
    ));

    let verifier = TokenVerifier::new(
        keys.clone(),
        VerifierSettings {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            algorithms: config.algorithms.clone(),
            leeway_seconds: config.leeway_seconds,
        },
    );

    Ok((Arc::new(AuthGate::new(verifier)), keys))
}

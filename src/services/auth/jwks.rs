//! Signing key set (JWKS) retrieval and caching.
//!
//! - Keys are cached by `kid` and never evicted (append-only).
//! - A lookup miss triggers a refresh. Refreshes are serialized and the cache is
//!   re-checked after acquiring the lock, so concurrent first-sight requests fetch once.
//! - A cooldown after each successful refresh bounds how often unknown `kid`s can
//!   hit the issuer. A failed refresh does not start it.
//! - Every failure on this path is reported as `AuthError::UnknownSigningKey`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use url::Url;

use super::AuthError;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("key set request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("key set endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("key set unavailable: {0}")]
    Unavailable(String),
}

/// Where the published key set comes from.
#[async_trait]
pub trait KeySetSource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, KeySetError>;
}

/// Fetches the key set from the issuer's well-known endpoint.
#[derive(Debug, Clone)]
pub struct HttpKeySetSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpKeySetSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, KeySetError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl KeySetSource for HttpKeySetSource {
    async fn fetch(&self) -> Result<JwkSet, KeySetError> {
        let response = self.client.get(self.url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(KeySetError::Status(response.status()));
        }

        Ok(response.json::<JwkSet>().await?)
    }
}

/// A verification key plus the algorithm the key set pins it to (if any).
#[derive(Clone)]
pub struct SigningKey {
    pub decoding_key: DecodingKey,
    pub algorithm: Option<Algorithm>,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    /// Extra attempts after a failed fetch.
    pub retries: u32,
    /// Minimum time between two refreshes.
    pub cooldown: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            cooldown: Duration::from_secs(30),
        }
    }
}

pub struct JwksCache {
    source: Arc<dyn KeySetSource>,
    policy: RefreshPolicy,
    keys: RwLock<HashMap<String, SigningKey>>,
    // Time of the last successful refresh; the lock itself serializes refreshes.
    last_refresh: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for JwksCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksCache")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl JwksCache {
    pub fn new(source: Arc<dyn KeySetSource>, policy: RefreshPolicy) -> Self {
        Self {
            source,
            policy,
            keys: RwLock::new(HashMap::new()),
            last_refresh: Mutex::new(None),
        }
    }

    /// Returns the key for `kid`, refreshing the key set once on a miss.
    pub async fn get(&self, kid: &str) -> Result<SigningKey, AuthError> {
        if let Some(key) = self.lookup(kid).await {
            return Ok(key);
        }

        let mut last_refresh = self.last_refresh.lock().await;

        // Another request may have refreshed while we were waiting for the lock.
        if let Some(key) = self.lookup(kid).await {
            return Ok(key);
        }

        if let Some(at) = *last_refresh
            && at.elapsed() < self.policy.cooldown
        {
            tracing::debug!(kid, "unknown key id within refresh cooldown");
            return Err(AuthError::UnknownSigningKey);
        }

        // Only a successful refresh starts the cooldown; after an outage the next miss retries.
        self.refresh().await.map_err(|err| {
            tracing::warn!(error = %err, "signing key set refresh failed");
            AuthError::UnknownSigningKey
        })?;
        *last_refresh = Some(Instant::now());
        drop(last_refresh);

        self.lookup(kid).await.ok_or_else(|| {
            tracing::warn!(kid, "key id not present in the issuer's key set");
            AuthError::UnknownSigningKey
        })
    }

    /// Loads the key set ahead of the first request. Failures are not fatal.
    pub async fn prefetch(&self) {
        let mut last_refresh = self.last_refresh.lock().await;
        match self.refresh().await {
            Ok(()) => *last_refresh = Some(Instant::now()),
            Err(err) => tracing::warn!(error = %err, "could not prefetch signing key set"),
        }
    }

    /// Number of cached keys.
    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keys.read().await.is_empty()
    }

    async fn lookup(&self, kid: &str) -> Option<SigningKey> {
        self.keys.read().await.get(kid).cloned()
    }

    async fn refresh(&self) -> Result<(), KeySetError> {
        let set = self.fetch_with_retry().await?;

        let mut keys = self.keys.write().await;
        let before = keys.len();
        for jwk in &set.keys {
            let Some(kid) = jwk.common.key_id.as_deref() else {
                continue;
            };
            if keys.contains_key(kid) {
                continue;
            }
            match signing_key_from_jwk(jwk) {
                Some(key) => {
                    keys.insert(kid.to_string(), key);
                }
                None => tracing::debug!(kid, "skipping unusable key in key set"),
            }
        }

        tracing::info!(added = keys.len() - before, total = keys.len(), "signing key set refreshed");
        Ok(())
    }

    async fn fetch_with_retry(&self) -> Result<JwkSet, KeySetError> {
        let mut attempt = 0;
        loop {
            match self.source.fetch().await {
                Ok(set) => return Ok(set),
                Err(err) if attempt < self.policy.retries => {
                    attempt += 1;
                    tracing::warn!(error = %err, attempt, "key set fetch failed, retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }
}

// Only asymmetric keys are usable: an `oct` key in a public key set would turn
// into an HMAC secret and open the door to algorithm substitution.
fn signing_key_from_jwk(jwk: &Jwk) -> Option<SigningKey> {
    if matches!(jwk.algorithm, AlgorithmParameters::OctetKey(_)) {
        return None;
    }

    let decoding_key = DecodingKey::from_jwk(jwk).ok()?;
    let algorithm = match jwk.common.key_algorithm.as_ref() {
        Some(alg) => Some(algorithm_for(alg)?),
        None => None,
    };

    Some(SigningKey {
        decoding_key,
        algorithm,
    })
}

fn algorithm_for(alg: &KeyAlgorithm) -> Option<Algorithm> {
    match alg {
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        KeyAlgorithm::ES256 => Some(Algorithm::ES256),
        KeyAlgorithm::ES384 => Some(Algorithm::ES384),
        KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
        _ => None,
    }
}

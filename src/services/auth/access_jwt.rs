use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation};
use serde::{Deserialize, Deserializer};

use super::AuthError;
use super::jwks::JwksCache;

/// Access token claims, available to handlers only after verification.
///
/// NOTE:
/// - `aud` can be either a string or an array; jsonwebtoken validates it via `Validation::set_audience`.
/// - `permissions` stays optional so that "no permissions claim" and "permission not granted"
///   can be told apart by the authorizer. A claim that is not a list of strings counts as absent.
/// - Everything else the issuer put in the token is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    pub iss: String,
    #[serde(default)]
    pub aud: serde_json::Value,
    pub exp: u64,

    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iat: Option<u64>,

    #[serde(default, deserialize_with = "permission_list")]
    pub permissions: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn permission_list<'de, D>(de: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(de)?;
    Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}

impl Claims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }
}

/// Static trust settings for the verifier.
#[derive(Debug, Clone)]
pub struct VerifierSettings {
    pub issuer: String,
    pub audience: String,
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,
}

/// Access-token verifier backed by the issuer's published key set.
#[derive(Debug)]
pub struct TokenVerifier {
    keys: Arc<JwksCache>,
    settings: VerifierSettings,
}

impl TokenVerifier {
    pub fn new(keys: Arc<JwksCache>, settings: VerifierSettings) -> Self {
        Self { keys, settings }
    }

    /// Verify signature and standard claims, then decode the claims.
    ///
    /// Order matters: header shape, then key lookup, then the algorithm allow-list,
    /// then signature, then `exp` / `iss` / `aud`.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.split('.').count() != 3 {
            return Err(AuthError::MalformedToken);
        }

        let header = jsonwebtoken::decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        let kid = header.kid.as_deref().ok_or(AuthError::MalformedToken)?;

        let key = self.keys.get(kid).await?;

        if !self.settings.algorithms.contains(&header.alg) {
            tracing::warn!(alg = ?header.alg, kid, "token algorithm is not allowed");
            return Err(AuthError::InvalidSignature);
        }
        if let Some(pinned) = key.algorithm
            && pinned != header.alg
        {
            tracing::warn!(alg = ?header.alg, ?pinned, kid, "token algorithm does not match its key");
            return Err(AuthError::InvalidSignature);
        }

        let validation = self.validation(header.alg);
        let data = jsonwebtoken::decode::<Claims>(token, &key.decoding_key, &validation)
            .map_err(|e| classify(e.kind()))?;

        Ok(data.claims)
    }

    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.set_issuer(&[&self.settings.issuer]);
        validation.set_audience(&[&self.settings.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = self.settings.leeway_seconds;
        validation
    }
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::Json(_) => AuthError::InvalidClaims,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            AuthError::MalformedToken
        }
        _ => AuthError::InvalidSignature,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn claims(value: serde_json::Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn keeps_unknown_claims() {
        let c = claims(json!({
            "iss": "https://issuer/",
            "aud": ["drinks", "userinfo"],
            "exp": 1,
            "azp": "client-id",
            "permissions": ["get:drinks"],
        }));

        assert_eq!(c.extra.get("azp"), Some(&json!("client-id")));
        assert_eq!(c.sub, None);
        assert!(c.has_permission("get:drinks"));
    }

    #[test]
    fn permission_match_is_exact() {
        let c = claims(json!({
            "iss": "i", "exp": 1,
            "permissions": ["get:drinks"],
        }));

        assert!(!c.has_permission("get:drinks-detail"));
        assert!(!c.has_permission("GET:drinks"));
        assert!(!c.has_permission("get:*"));
    }

    #[test]
    fn mistyped_permissions_count_as_absent() {
        for permissions in [json!("get:drinks"), json!(null), json!([1, 2]), json!({"get": "drinks"})] {
            let c = claims(json!({"iss": "i", "exp": 1, "permissions": permissions}));
            assert_eq!(c.permissions, None);
            assert!(!c.has_permission("get:drinks"));
        }
    }

    #[test]
    fn classifies_jwt_errors() {
        assert_eq!(classify(&ErrorKind::ExpiredSignature), AuthError::TokenExpired);
        assert_eq!(classify(&ErrorKind::InvalidIssuer), AuthError::InvalidClaims);
        assert_eq!(classify(&ErrorKind::InvalidAudience), AuthError::InvalidClaims);
        assert_eq!(
            classify(&ErrorKind::MissingRequiredClaim("aud".into())),
            AuthError::InvalidClaims
        );
        assert_eq!(classify(&ErrorKind::InvalidSignature), AuthError::InvalidSignature);
        assert_eq!(classify(&ErrorKind::InvalidAlgorithm), AuthError::InvalidSignature);
        assert_eq!(classify(&ErrorKind::InvalidToken), AuthError::MalformedToken);
    }
}

/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, AUTH_DOMAIN, AUTH_AUDIENCE など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - issuer / JWKS URL はドメインから導出する (明示指定で上書き可)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Trusted issuer settings for access-token verification.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub jwks_url: Url,
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,
    pub jwks_timeout: Duration,
    pub jwks_fetch_retries: u32,
    pub jwks_refresh_cooldown: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,

    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (env in production, a map in tests).
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&get, "PORT", 3000)?;
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = get("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections = parse_or(&get, "DATABASE_MAX_CONNECTIONS", 5)?;

        let cors_allowed_origins = split_list(&get("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let request_timeout = Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECONDS", 30)?);
        let request_body_limit_bytes = parse_or(&get, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        let auth = AuthConfig::from_lookup(&get)?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            request_timeout,
            request_body_limit_bytes,
            auth,
        })
    }
}

impl AuthConfig {
    fn from_lookup<F>(get: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let domain = get("AUTH_DOMAIN")
            .map(|d| d.trim().trim_end_matches('/').to_string())
            .filter(|d| !d.is_empty())
            .ok_or(ConfigError::Missing("AUTH_DOMAIN"))?;

        let audience = get("AUTH_AUDIENCE")
            .filter(|a| !a.trim().is_empty())
            .ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        // The issuer the identity provider writes into `iss` carries a trailing slash.
        let issuer = get("AUTH_ISSUER").unwrap_or_else(|| format!("https://{}/", domain));

        let jwks_url = match get("AUTH_JWKS_URL") {
            Some(raw) => Url::parse(&raw).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?,
            None => Url::parse(&format!("https://{}/.well-known/jwks.json", domain))
                .map_err(|_| ConfigError::Invalid("AUTH_DOMAIN"))?,
        };

        let algorithms = parse_algorithms(&get("AUTH_ALGORITHMS").unwrap_or_else(|| "RS256".into()))?;

        Ok(Self {
            issuer,
            audience,
            jwks_url,
            algorithms,
            leeway_seconds: parse_or(get, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?,
            jwks_timeout: Duration::from_secs(parse_or(get, "JWKS_TIMEOUT_SECONDS", 5)?),
            jwks_fetch_retries: parse_or(get, "JWKS_FETCH_RETRIES", 1)?,
            jwks_refresh_cooldown: Duration::from_secs(parse_or(
                get,
                "JWKS_REFRESH_COOLDOWN_SECONDS",
                30,
            )?),
        })
    }
}

/// Parses a comma-separated list of JWS algorithms.
///
/// Keys come from a published key set, so only asymmetric algorithms make sense here.
/// HMAC algorithms are refused outright to rule out algorithm-substitution attacks.
pub fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let mut algorithms = Vec::new();
    for name in split_list(raw) {
        let alg = Algorithm::from_str(&name).map_err(|_| ConfigError::Invalid("AUTH_ALGORITHMS"))?;
        if matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(ConfigError::Invalid("AUTH_ALGORITHMS"));
        }
        if !algorithms.contains(&alg) {
            algorithms.push(alg);
        }
    }

    if algorithms.is_empty() {
        return Err(ConfigError::Invalid("AUTH_ALGORITHMS"));
    }
    Ok(algorithms)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<F, T>(get: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

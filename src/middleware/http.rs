//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limit and global timeout, both from `Config`
//!   (the limit is enforced by the body extractors, so it runs after auth and
//!   surfaces as a 413 envelope)
//! - CORS for the browser client
//!
//! Auth is not applied here: each handler declares its scope via `Authorized<S>`.

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;

const REQUEST_ID: &str = "x-request-id";

pub fn apply(router: Router, config: &Config) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID);

    let layers = ServiceBuilder::new()
        // Timeouts (and any other layer error) become envelope-shaped responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                AppError::RequestTimeout
            } else {
                tracing::error!(error = %err, "unhandled middleware error");
                AppError::Internal
            }
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TraceLayer::new_for_http())
        .layer(cors(config))
        .layer(DefaultBodyLimit::max(config.request_body_limit_bytes))
        .layer(TimeoutLayer::new(config.request_timeout));

    router.layer(layers)
}

/// Development: any origin. Production: exact-match allowlist (empty allowlist = no CORS).
/// Credentials are never allowed; the token travels in the Authorization header.
fn cors(config: &Config) -> CorsLayer {
    let cors = if config.app_env.is_production() {
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        }))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    cors.allow_methods([
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        HeaderName::from_static(REQUEST_ID),
    ])
    .max_age(std::time::Duration::from_secs(60 * 10))
}

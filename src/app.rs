/*
 * Responsibility
 * - tracing 初期化 → Config 読み込み → 依存生成 (DB pool / 鍵キャッシュ / AuthGate) → Router 組み立て
 * - Middleware の適用 (request-id / trace / CORS / timeout)
 * - axum::serve() で起動 (Ctrl-C / SIGTERM で graceful shutdown)
 */
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    repos::drink_repo::PgDrinkRepo,
    services::auth::build_auth_gate,
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,drinks_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    tracing::info!(
        "starting drinks API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = middleware::http::apply(build_router(state), &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    // The pool connects on first use; the schema is managed outside the service (see sql/).
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;

    let (auth, keys) = build_auth_gate(&config.auth).context("failed to build auth gate")?;
    keys.prefetch().await;

    Ok(AppState::new(Arc::new(PgDrinkRepo::new(db)), auth, keys))
}

/// Routes with state applied, without the HTTP middleware stack.
pub fn build_router(state: AppState) -> Router {
    api::routes().with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

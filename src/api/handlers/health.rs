/*
 * Responsibility
 * - GET /health (疎通用, 認証なし)
 * - 署名鍵キャッシュの状態も返す (鍵未取得でも 200: 初回リクエストで取得するため)
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let signing_keys = state.keys.len().await;
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "signing_keys": signing_keys})),
    )
}

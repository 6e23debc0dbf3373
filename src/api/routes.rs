/*
 * Responsibility
 * - URL 構造を定義 (既存クライアント互換のため root 直下)
 * - 各 endpoint の必要 scope は handler 引数の Authorized<S> で宣言する
 * - 未定義パス / メソッドも共通 envelope で返す
 */
use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use crate::api::handlers::{
    drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
    fallback::{method_not_allowed, not_found},
    health::health,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/drinks", get(list_drinks).post(create_drink))
        .route("/drinks-detail", get(list_drinks_detail))
        .route("/drinks/{drink_id}", patch(update_drink).delete(delete_drink))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

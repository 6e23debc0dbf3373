/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - drinks: DrinkRepo, auth: AuthGate, keys: 署名鍵キャッシュ
 * - グローバル変数は使わず、起動時に組み立てて注入する
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::repos::drink_repo::DrinkRepo;
use crate::services::auth::{AuthGate, jwks::JwksCache};

#[derive(Clone)]
pub struct AppState {
    pub drinks: Arc<dyn DrinkRepo>,
    pub auth: Arc<AuthGate>,
    pub keys: Arc<JwksCache>,
}

impl AppState {
    pub fn new(drinks: Arc<dyn DrinkRepo>, auth: Arc<AuthGate>, keys: Arc<JwksCache>) -> Self {
        Self {
            drinks,
            auth,
            keys,
        }
    }
}

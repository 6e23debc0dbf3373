/*!
 * Scope-gated authorization extractor
 *
 * Responsibility:
 * - handler 引数の型で「必要な scope」を宣言し、AuthGate を通った claims だけを渡す
 * - axum 依存は core に閉じ込め、scope タグ型は types に分離する
 *
 * Public API:
 * - Authorized<S>
 * - RequiredScope と各 scope タグ (GetDrinks, PostDrinks, ...)
 */
mod core;
mod types;

pub use self::core::Authorized;
pub use self::types::*;

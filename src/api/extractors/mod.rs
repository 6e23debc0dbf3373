/*
 * Responsibility
 * - handler 向け extractor の公開 (re-export)
 */
pub mod authorized;

pub use authorized::Authorized;

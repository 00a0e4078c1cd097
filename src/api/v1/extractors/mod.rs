/**
 * Responsibility
 *  - handler が使う extractor の公開窓口
 */
mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};

/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - bearer gate は v1 全体に掛ける (止めはしない)。認証が必要な handler は AuthCtxExtractor を取る
 */
use axum::{Router, routing::get};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::me::{admin_ping, me};

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/me", get(me))
        .route("/admin/ping", get(admin_ping));

    access::apply(router, state)
}

/*
 * Responsibility
 * - bearer gate が載せた AuthCtx を使う handler
 * - AuthCtx が無ければ extractor が 401、権限不足は 403
 */
use axum::Json;
use serde_json::{Value, json};

use crate::{
    api::v1::{dto::me::MeResponse, extractors::AuthCtxExtractor},
    error::AppError,
};

pub const ADMIN_AUTHORITY: &str = "ROLE_ADMIN";

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse::from(&ctx))
}

pub async fn admin_ping(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Result<Json<Value>, AppError> {
    ctx.require_authority(ADMIN_AUTHORITY)?;

    tracing::info!(
        subject = %ctx.username(),
        client_addr = ?ctx.client_addr,
        request_id = ?ctx.request_id,
        "admin ping"
    );

    Ok(Json(json!({ "status": "ok" })))
}

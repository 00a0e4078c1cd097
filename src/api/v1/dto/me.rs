/*
 * Responsibility
 * - 認証済み主体の response DTO
 */
use serde::Serialize;

use crate::api::v1::extractors::AuthCtx;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub authorities: Vec<String>,
}

impl From<&AuthCtx> for MeResponse {
    fn from(ctx: &AuthCtx) -> Self {
        Self {
            username: ctx.identity.username.clone(),
            authorities: ctx.identity.authorities.iter().cloned().collect(),
        }
    }
}

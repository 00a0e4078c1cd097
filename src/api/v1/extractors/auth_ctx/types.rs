/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - 1 リクエストにつき最大 1 つ。リクエスト終了とともに破棄される
 */
use std::net::SocketAddr;

use crate::error::AppError;
use crate::services::auth::Identity;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `identity` は検証済みトークンに対応する主体 (username + authorities)
/// - `client_addr` / `request_id` は監査/ログ相関用のメタデータ
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: Identity,
    pub client_addr: Option<SocketAddr>,
    pub request_id: Option<String>,
}

impl AuthCtx {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            client_addr: None,
            request_id: None,
        }
    }

    pub fn with_request_meta(
        mut self,
        client_addr: Option<SocketAddr>,
        request_id: Option<String>,
    ) -> Self {
        self.client_addr = client_addr;
        self.request_id = request_id;
        self
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    /// 403 unless the identity holds `authority`.
    pub fn require_authority(&self, authority: &str) -> Result<(), AppError> {
        if self.identity.has_authority(authority) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

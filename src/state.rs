/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: 署名鍵を持つ TokenVerifier (起動後は読み取りのみ)
 *   - identities: subject -> Identity の解決 (並行アクセス前提)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::auth::{IdentityLookup, LookupFailurePolicy, TokenVerifier};

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub identities: Arc<dyn IdentityLookup>,
    pub lookup_failure_policy: LookupFailurePolicy,
}

impl AppState {
    pub fn new(
        verifier: Arc<TokenVerifier>,
        identities: Arc<dyn IdentityLookup>,
        lookup_failure_policy: LookupFailurePolicy,
    ) -> Self {
        Self {
            verifier,
            identities,
            lookup_failure_policy,
        }
    }
}

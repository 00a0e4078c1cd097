//! Bearer gate: access token (HS256 JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - 1 リクエストにつき 1 回だけ実行される。
//! - 資格情報が無い/無効でもリクエストは止めない (AuthCtx が入らないだけ)。
//!   401/403 は AuthCtx を使う handler 側 (`AuthCtxExtractor`, `require_authority`) が返す。
//! - 例外は identity lookup の失敗のみで、`LookupFailurePolicy` に従う。

use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::middleware::http::REQUEST_ID_HEADER;
use crate::services::auth::{IdentityLookup, LookupError, LookupFailurePolicy, TokenVerifier};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Result of running the gate for one request.
#[derive(Debug)]
pub enum AuthOutcome {
    /// No usable credential, or the token did not validate.
    Unauthenticated,
    /// An AuthCtx was already attached earlier in the pipeline; left untouched.
    AlreadyAuthenticated,
    Authenticated(AuthCtx),
}

/// Transport metadata copied into the AuthCtx on success.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub client_addr: Option<SocketAddr>,
    pub request_id: Option<String>,
}

impl RequestMeta {
    pub fn from_request(req: &Request<Body>) -> Self {
        Self {
            client_addr: req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
            request_id: req
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

/// 保護対象の Router に bearer gate を掛ける。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let meta = RequestMeta::from_request(&req);
    let already_authenticated = req.extensions().get::<AuthCtx>().is_some();

    let outcome = match authenticate(
        &state.verifier,
        state.identities.as_ref(),
        req.headers(),
        already_authenticated,
        meta,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(err) => match state.lookup_failure_policy {
            LookupFailurePolicy::Reject => {
                tracing::warn!(
                    error = %err,
                    backend = state.identities.backend_name(),
                    "identity lookup failed; rejecting request"
                );
                return Err(err.into());
            }
            LookupFailurePolicy::Continue => {
                tracing::warn!(
                    error = %err,
                    backend = state.identities.backend_name(),
                    "identity lookup failed; continuing unauthenticated"
                );
                AuthOutcome::Unauthenticated
            }
        },
    };

    // middleware → extractor への受け渡し
    if let AuthOutcome::Authenticated(auth_ctx) = outcome {
        req.extensions_mut().insert(auth_ctx);
    }

    Ok(next.run(req).await)
}

/// Decide whether this request carries a valid identity.
///
/// Token problems never produce an error; only the identity lookup can fail.
pub async fn authenticate(
    verifier: &TokenVerifier,
    identities: &dyn IdentityLookup,
    headers: &HeaderMap,
    already_authenticated: bool,
    meta: RequestMeta,
) -> Result<AuthOutcome, LookupError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(AuthOutcome::Unauthenticated);
    };

    let subject = match verifier.extract_subject(token) {
        Ok(subject) => subject,
        Err(err) => {
            tracing::debug!(error = %err, "bearer token rejected");
            return Ok(AuthOutcome::Unauthenticated);
        }
    };

    if already_authenticated {
        return Ok(AuthOutcome::AlreadyAuthenticated);
    }

    let identity = identities.load_identity(&subject).await?;

    if !verifier.is_valid(token, &identity) {
        return Ok(AuthOutcome::Unauthenticated);
    }

    tracing::debug!(subject = %identity.username, "request authenticated");
    Ok(AuthOutcome::Authenticated(
        AuthCtx::new(identity).with_request_meta(meta.client_addr, meta.request_id),
    ))
}

/// `Authorization: Bearer <token>` から token を取り出す。
///
/// Missing, blank, non-UTF-8, other schemes and an empty token are all `None`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    if value.trim().is_empty() {
        return None;
    }

    value
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
}

/// Factories: build the auth services from application `Config`.
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::auth::{IdentityLookup, TokenVerifier, pg_lookup::PgIdentityLookup};

pub fn build_token_verifier(config: &Config) -> Arc<TokenVerifier> {
    Arc::new(TokenVerifier::new(
        config.jwt_secret.as_bytes(),
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    ))
}

pub fn build_identity_lookup(config: &Config, db: PgPool) -> Arc<dyn IdentityLookup> {
    Arc::new(PgIdentityLookup::new(db, config.identity_lookup_timeout))
}

//! Resolved principals and the lookup interface the bearer gate calls into.
use std::{collections::BTreeSet, str::FromStr, time::Duration};

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::repos::error::RepoError;

/// A resolved principal.
///
/// - `username` is the unique key (email) and must equal the token's `sub`.
/// - `credential_fingerprint` changes whenever the user's credentials change,
///   so tokens bound to the old value stop validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub authorities: BTreeSet<String>,
    pub credential_fingerprint: Option<String>,
}

impl Identity {
    pub fn new<I, S>(username: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
            credential_fingerprint: None,
        }
    }

    pub fn with_credential_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.credential_fingerprint = Some(fingerprint.into());
        self
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    /// base64url(sha256(material)), unpadded.
    pub fn fingerprint_of(material: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(material.as_bytes()))
    }
}

/// Identity lookup failures.
///
/// Kept separate from `AppError` so the gate decides (via `LookupFailurePolicy`)
/// whether a failure rejects the request or leaves it unauthenticated.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unknown subject: {0}")]
    UnknownSubject(String),
    #[error("identity backend error: {0}")]
    Backend(#[from] RepoError),
    #[error("identity lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Resolve a token subject into a full `Identity`.
///
/// Implementations must be safe for concurrent use; one instance is shared by
/// every in-flight request. Any timeout belongs to the implementation.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// Backend name, for logging.
    fn backend_name(&self) -> &'static str;

    async fn load_identity(&self, subject: &str) -> Result<Identity, LookupError>;
}

/// What the gate does when the identity lookup fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailurePolicy {
    /// Fail the request: 401 for an unknown subject, 500 for backend failures.
    Reject,
    /// Log and continue without an identity.
    Continue,
}

impl FromStr for LookupFailurePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "continue" => Ok(Self::Continue),
            _ => Err(()),
        }
    }
}

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::services::auth::identity::Identity;

/// Reasons a bearer token is not accepted.
///
/// None of these reach the client: the gate treats all of them as "no identity".
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("subject does not match the resolved identity")]
    SubjectMismatch,
    #[error("token expired")]
    Expired,
    #[error("credential fingerprint does not match the resolved identity")]
    CredentialMismatch,
}

/// Claims carried by an access token.
///
/// `sub` is the user's email. `cfp` binds the token to the credentials the
/// user had when it was issued.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub exp: i64,

    #[serde(default)]
    pub cfp: Option<String>,
}

/// HS256 access-token verifier.
///
/// - Offline only: signature, claims and expiry are checked from the token itself.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: i64,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(
        secret: &[u8],
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `is_valid` (strictly after now), so an expired
        // token still yields its subject here.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            leeway_seconds: i64::try_from(leeway_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Verify the signature and decode the claims. Expiry is not checked.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        if data.claims.sub.trim().is_empty() {
            return Err(TokenError::EmptyClaim("sub"));
        }

        Ok(data.claims)
    }

    /// Subject (email) of a correctly signed token.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// Full validation of `token` for `identity` at the current time.
    ///
    /// Never fails: any parse error, mismatch or expiry is `false`.
    pub fn is_valid(&self, token: &str, identity: &Identity) -> bool {
        self.is_valid_at(token, identity, chrono::Utc::now().timestamp())
    }

    pub fn is_valid_at(&self, token: &str, identity: &Identity, now: i64) -> bool {
        match self.check(token, identity, now) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, subject = %identity.username, "token rejected");
                false
            }
        }
    }

    fn check(&self, token: &str, identity: &Identity, now: i64) -> Result<(), TokenError> {
        let claims = self.decode(token)?;

        if claims.sub != identity.username {
            return Err(TokenError::SubjectMismatch);
        }
        if claims.exp.saturating_add(self.leeway_seconds) <= now {
            return Err(TokenError::Expired);
        }
        if let Some(cfp) = claims.cfp.as_deref()
            && identity.credential_fingerprint.as_deref() != Some(cfp)
        {
            return Err(TokenError::CredentialMismatch);
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    pub const SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

    #[derive(Serialize)]
    pub struct MintClaims<'a> {
        pub sub: &'a str,
        pub exp: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub cfp: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub iss: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub aud: Option<&'a str>,
    }

    pub fn mint_with(secret: &[u8], claims: &MintClaims<'_>) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    /// Token for `sub` expiring `ttl` seconds from now (negative = already expired).
    pub fn mint(sub: &str, ttl: i64) -> String {
        mint_with(
            SECRET,
            &MintClaims {
                sub,
                exp: chrono::Utc::now().timestamp() + ttl,
                cfp: None,
                iss: None,
                aud: None,
            },
        )
    }
}

pub mod factory;
pub mod identity;
#[cfg(test)]
pub mod memory;
pub mod pg_lookup;
pub mod token_verifier;

pub use factory::{build_identity_lookup, build_token_verifier};
pub use identity::{Identity, IdentityLookup, LookupError, LookupFailurePolicy};
pub use token_verifier::TokenVerifier;

use async_trait::async_trait;
use thiserror::Error;

use crate::services::auth::claims::{ClaimError, ClaimSet};

/// Why a token failed cryptographic, structural or temporal validation.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("algorithm {0} is not allowed")]
    UnsupportedAlgorithm(String),
    #[error("token header has no 'kid'")]
    MissingKeyId,
    #[error("no signing key for kid {0}")]
    UnknownKey(String),
    #[error("signing key {kid} is unusable: {reason}")]
    InvalidKey { kid: String, reason: String },
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token rejected: {0}")]
    Rejected(String),
    /// Payload could not be turned into a `ClaimSet`. `JwtClaimsVerifier`
    /// never returns this (jsonwebtoken rejects non-object payloads first);
    /// it is for verifiers that build claims via `ClaimSet::try_from`.
    #[error(transparent)]
    Payload(#[from] ClaimError),
}

/// Turns an encoded token into a trusted claim set, or fails.
///
/// Implementations own everything cryptographic: signature, algorithm,
/// key lookup, expiry. Callers only apply semantic checks to the result.
#[async_trait]
pub trait ClaimsVerifier: Send + Sync {
    async fn process(&self, token: &str) -> Result<ClaimSet, VerifierError>;
}

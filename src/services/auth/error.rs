use thiserror::Error;

use crate::services::auth::claims::ClaimError;
use crate::services::auth::verifier::VerifierError;

/// Reasons an ID token is rejected.
///
/// "No identity" is not an error; see `IdentityResolver::authenticate`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token verification failed: {0}")]
    TokenVerification(#[from] VerifierError),

    #[error("issuer {} in token doesn't match expected issuer {expected}", .observed.as_deref().unwrap_or("<none>"))]
    IssuerMismatch {
        observed: Option<String>,
        expected: String,
    },

    #[error("token is not an ID token (token_use: {})", .observed.as_deref().unwrap_or("<none>"))]
    WrongTokenClass { observed: Option<String> },

    #[error("invalid '{claim}' claim: {source}")]
    InvalidClaim {
        claim: String,
        #[source]
        source: ClaimError,
    },
}

impl AuthError {
    /// Stable machine-readable code for logs and error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TokenVerification(_) => "TOKEN_INVALID",
            Self::IssuerMismatch { .. } => "ISSUER_MISMATCH",
            Self::WrongTokenClass { .. } => "WRONG_TOKEN_CLASS",
            Self::InvalidClaim { .. } => "INVALID_CLAIM",
        }
    }
}

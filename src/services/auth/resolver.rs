//! ID token -> application identity.
//!
//! Pipeline per request: strip bearer prefix, verify (delegated), check
//! issuer and `token_use`, read username and groups, map groups to roles,
//! then record the token in the request's credential slot.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

use crate::config::IdTokenConfig;
use crate::services::auth::{
    bearer::strip_bearer_prefix,
    claims::ClaimSet,
    credentials::IdTokenCredentials,
    error::AuthError,
    identity::{ResolvedIdentity, Role},
    verifier::ClaimsVerifier,
};

pub const ID_TOKEN_USE: &str = "id";

#[derive(Clone)]
pub struct IdentityResolver {
    config: Arc<IdTokenConfig>,
    verifier: Arc<dyn ClaimsVerifier>,
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IdentityResolver {
    pub fn new(config: Arc<IdTokenConfig>, verifier: Arc<dyn ClaimsVerifier>) -> Self {
        Self { config, verifier }
    }

    pub fn config(&self) -> &IdTokenConfig {
        &self.config
    }

    /// Resolve the identity carried by `header_value`.
    ///
    /// - `Ok(None)`: no header, or a verified token without a username.
    ///   The latter is a permissive fallback kept for compatibility; a
    ///   stricter deployment may want to reject such tokens instead.
    /// - `Ok(Some(_))`: authenticated; the stripped token is now in `credentials`.
    /// - `Err(_)`: the token was presented but is not acceptable.
    pub async fn authenticate(
        &self,
        header_value: Option<&str>,
        credentials: &IdTokenCredentials,
    ) -> Result<Option<ResolvedIdentity>, AuthError> {
        let Some(raw) = header_value else {
            tracing::trace!("no id token in request header");
            return Ok(None);
        };

        let token = strip_bearer_prefix(raw);
        let fingerprint = token_fingerprint(token);

        let claims = self.verifier.process(token).await?;

        self.check_issuer(&claims)?;
        check_token_use(&claims)?;

        let Some(username) = self.username(&claims)? else {
            tracing::debug!(%fingerprint, claim = %self.config.username_claim, "verified id token has no username");
            return Ok(None);
        };

        let roles = self
            .groups(&claims)?
            .iter()
            .map(|g| Role::from_group(g))
            .collect::<Vec<_>>();

        if credentials.set(token).is_err() {
            // The middleware hands out a fresh slot per request.
            tracing::warn!(%fingerprint, "id token credentials already set for this request");
        }

        tracing::debug!(%fingerprint, %username, roles = roles.len(), "id token authenticated");

        Ok(Some(ResolvedIdentity {
            username,
            roles,
            claims: Arc::new(claims),
        }))
    }

    fn check_issuer(&self, claims: &ClaimSet) -> Result<(), AuthError> {
        match claims.issuer() {
            Some(iss) if iss == self.config.issuer => Ok(()),
            observed => Err(AuthError::IssuerMismatch {
                observed: observed.map(str::to_string),
                expected: self.config.issuer.clone(),
            }),
        }
    }

    fn username(&self, claims: &ClaimSet) -> Result<Option<String>, AuthError> {
        let name = &self.config.username_claim;
        let username = claims
            .display_string(name)
            .map_err(|source| AuthError::InvalidClaim {
                claim: name.clone(),
                source,
            })?;

        Ok(username.filter(|u| !u.is_empty()))
    }

    fn groups<'a>(&self, claims: &'a ClaimSet) -> Result<&'a [String], AuthError> {
        let name = &self.config.groups_claim;
        let groups = claims
            .string_list(name)
            .map_err(|source| AuthError::InvalidClaim {
                claim: name.clone(),
                source,
            })?;

        Ok(groups.unwrap_or_default())
    }
}

fn check_token_use(claims: &ClaimSet) -> Result<(), AuthError> {
    match claims.token_use() {
        Some(ID_TOKEN_USE) => Ok(()),
        observed => Err(AuthError::WrongTokenClass {
            observed: observed.map(str::to_string),
        }),
    }
}

/// Short stable token identifier for logs; the token itself is never logged.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..8])
}

/*
 * Responsibility
 * - The authenticated context handlers see
 * - The middleware resolves it and stores it in request extensions; handlers only take this type
 */

use crate::services::auth::{IdTokenCredentials, ResolvedIdentity};

/// Context attached to requests that carried an acceptable ID token.
///
/// - `identity`: username, roles and the verified claims
/// - `credentials`: the same per-request slot the resolver wrote, for forwarding the token upstream
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: ResolvedIdentity,
    pub credentials: IdTokenCredentials,
}

impl AuthCtx {
    pub fn new(identity: ResolvedIdentity, credentials: IdTokenCredentials) -> Self {
        Self {
            identity,
            credentials,
        }
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }
}

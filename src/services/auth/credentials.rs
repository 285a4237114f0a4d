//! Per-request holder for the raw ID token.
//!
//! One `IdTokenCredentials` is created per inbound request by the auth
//! middleware and travels in request extensions. Clones share the slot, so
//! collaborators later in the same request (e.g. an upstream call forwarding
//! the token) see what the resolver wrote. Nothing outlives the request.

use std::sync::{Arc, OnceLock};

use thiserror::Error;

use crate::services::auth::bearer::BEARER_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("id token already set for this request")]
    AlreadySet,
}

#[derive(Clone, Default)]
pub struct IdTokenCredentials {
    id_token: Arc<OnceLock<String>>,
}

impl std::fmt::Debug for IdTokenCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the token
        f.debug_struct("IdTokenCredentials")
            .field("is_set", &self.is_set())
            .finish()
    }
}

impl IdTokenCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write-once: a second write in the same request is rejected and the
    /// first value stays.
    pub fn set(&self, token: impl Into<String>) -> Result<(), CredentialsError> {
        self.id_token
            .set(token.into())
            .map_err(|_| CredentialsError::AlreadySet)
    }

    pub fn get(&self) -> Option<&str> {
        self.id_token.get().map(String::as_str)
    }

    pub fn is_set(&self) -> bool {
        self.id_token.get().is_some()
    }

    /// `Authorization` value for forwarding the same token upstream.
    pub fn bearer_header_value(&self) -> Option<String> {
        self.get().map(|t| format!("{BEARER_PREFIX}{t}"))
    }
}

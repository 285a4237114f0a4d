use std::{fmt, sync::Arc};

use serde::Serialize;

use crate::services::auth::claims::ClaimSet;

pub const ROLE_PREFIX: &str = "ROLE_";

/// Authorization label derived from an identity-provider group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// `admins` -> `ROLE_ADMINS`
    pub fn from_group(group: &str) -> Self {
        Self(format!("{ROLE_PREFIX}{}", group.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a successful ID-token authentication.
///
/// `claims` is kept for downstream inspection only; it is never re-validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIdentity {
    pub username: String,
    pub roles: Vec<Role>,
    pub claims: Arc<ClaimSet>,
}

impl ResolvedIdentity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_prefixed_and_upper_cased() {
        assert_eq!(Role::from_group("admins").as_str(), "ROLE_ADMINS");
        assert_eq!(Role::from_group("Read-Only").as_str(), "ROLE_READ-ONLY");
        assert_eq!(Role::from_group("").as_str(), "ROLE_");
    }

    #[test]
    fn role_serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![Role::from_group("readers")]).unwrap();
        assert_eq!(json, r#"["ROLE_READERS"]"#);
    }
}

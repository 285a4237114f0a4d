//! Verified claim set with typed accessors.
//!
//! Values keep their JSON shape as a tagged union. Accessors fail with
//! `ClaimError::TypeMismatch` instead of coercing, except `display_string`
//! which renders strings and numbers (used for the username).

use std::collections::HashMap;

use serde_json::{Number, Value};
use thiserror::Error;

pub const ISSUER: &str = "iss";
pub const TOKEN_USE: &str = "token_use";

#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    StringList(Vec<String>),
    // Arrays with non-string members and nested objects.
    Other(Value),
}

impl ClaimValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::StringList(_) => "string list",
            Self::Other(Value::Array(_)) => "array",
            Self::Other(_) => "object",
        }
    }
}

impl From<Value> for ClaimValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) if items.iter().all(Value::is_string) => Self::StringList(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("claim '{claim}' is a {found}, expected {expected}")]
    TypeMismatch {
        claim: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Raised by `ClaimSet::try_from` for verifiers handing over raw JSON.
    #[error("token payload is not a JSON object")]
    NotAnObject,
}

/// Claims of a token that already passed cryptographic verification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSet {
    claims: HashMap<String, ClaimValue>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for verifiers and tests.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name.into(), ClaimValue::from(value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.claims.get(name)
    }

    /// String claim. Absent and `null` both read as `None`.
    pub fn string(&self, name: &str) -> Result<Option<&str>, ClaimError> {
        match self.get(name) {
            None | Some(ClaimValue::Null) => Ok(None),
            Some(ClaimValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(mismatch(name, "string", other)),
        }
    }

    /// List-of-strings claim. Absent and `null` both read as `None`.
    pub fn string_list(&self, name: &str) -> Result<Option<&[String]>, ClaimError> {
        match self.get(name) {
            None | Some(ClaimValue::Null) => Ok(None),
            Some(ClaimValue::StringList(items)) => Ok(Some(items)),
            Some(other) => Err(mismatch(name, "string list", other)),
        }
    }

    pub fn number(&self, name: &str) -> Result<Option<&Number>, ClaimError> {
        match self.get(name) {
            None | Some(ClaimValue::Null) => Ok(None),
            Some(ClaimValue::Number(n)) => Ok(Some(n)),
            Some(other) => Err(mismatch(name, "number", other)),
        }
    }

    /// Scalar claim rendered as text: strings verbatim, numbers in their
    /// JSON form.
    pub fn display_string(&self, name: &str) -> Result<Option<String>, ClaimError> {
        match self.get(name) {
            None | Some(ClaimValue::Null) => Ok(None),
            Some(ClaimValue::String(s)) => Ok(Some(s.clone())),
            Some(ClaimValue::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(mismatch(name, "string or number", other)),
        }
    }

    pub fn issuer(&self) -> Option<&str> {
        self.string(ISSUER).ok().flatten()
    }

    pub fn token_use(&self) -> Option<&str> {
        self.string(TOKEN_USE).ok().flatten()
    }
}

impl TryFrom<Value> for ClaimSet {
    type Error = ClaimError;

    fn try_from(payload: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = payload else {
            return Err(ClaimError::NotAnObject);
        };

        Ok(Self {
            claims: map
                .into_iter()
                .map(|(k, v)| (k, ClaimValue::from(v)))
                .collect(),
        })
    }
}

fn mismatch(name: &str, expected: &'static str, found: &ClaimValue) -> ClaimError {
    ClaimError::TypeMismatch {
        claim: name.to_string(),
        expected,
        found: found.kind(),
    }
}

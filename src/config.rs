/*
 * Responsibility
 * - Load settings from the environment (.env supported)
 * - Validate eagerly; anything missing or malformed fails startup
 * - IdTokenConfig is what the identity resolver needs, JwtVerifierConfig what the
 *   token verifier needs; both are read-only after startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderName;
use jsonwebtoken::{Algorithm, jwk::JwkSet};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub const DEFAULT_USERNAME_CLAIM: &str = "cognito:username";
pub const DEFAULT_GROUPS_CLAIM: &str = "cognito:groups";

/// What the identity resolver checks claims against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdTokenConfig {
    pub http_header: HeaderName,
    pub issuer: String,
    pub username_claim: String,
    pub groups_claim: String,
}

impl IdTokenConfig {
    /// Defaults for everything except the issuer.
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            http_header: axum::http::header::AUTHORIZATION,
            issuer: issuer.into(),
            username_claim: DEFAULT_USERNAME_CLAIM.to_string(),
            groups_claim: DEFAULT_GROUPS_CLAIM.to_string(),
        }
    }
}

/// Signature/time validation settings for `JwtClaimsVerifier`.
#[derive(Debug, Clone)]
pub struct JwtVerifierConfig {
    pub jwks: JwkSet,
    pub algorithms: Vec<Algorithm>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub id_token: IdTokenConfig,
    pub verifier: JwtVerifierConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match lookup("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let id_token = id_token_config(&lookup)?;
        let verifier = verifier_config(&lookup)?;

        Ok(Self {
            addr,
            app_env,
            id_token,
            verifier,
        })
    }
}

fn id_token_config(lookup: &impl Fn(&str) -> Option<String>) -> Result<IdTokenConfig, ConfigError> {
    let http_header = match lookup("ID_TOKEN_HTTP_HEADER") {
        Some(name) => HeaderName::from_str(name.trim())
            .map_err(|_| ConfigError::Invalid("ID_TOKEN_HTTP_HEADER"))?,
        None => axum::http::header::AUTHORIZATION,
    };

    let issuer = match lookup("ID_TOKEN_ISSUER") {
        Some(issuer) => issuer.trim().to_string(),
        None => cognito_issuer(lookup)?,
    };
    // Compared verbatim against `iss`, but must at least look like a URL.
    Url::parse(&issuer).map_err(|_| ConfigError::Invalid("ID_TOKEN_ISSUER"))?;

    let username_claim =
        lookup("ID_TOKEN_USERNAME_CLAIM").unwrap_or_else(|| DEFAULT_USERNAME_CLAIM.to_string());
    let groups_claim =
        lookup("ID_TOKEN_GROUPS_CLAIM").unwrap_or_else(|| DEFAULT_GROUPS_CLAIM.to_string());

    Ok(IdTokenConfig {
        http_header,
        issuer,
        username_claim,
        groups_claim,
    })
}

/// `https://cognito-idp.<region>.amazonaws.com/<user pool id>`
fn cognito_issuer(lookup: &impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    let region = lookup("COGNITO_REGION").ok_or(ConfigError::Missing("ID_TOKEN_ISSUER"))?;
    let pool_id =
        lookup("COGNITO_USER_POOL_ID").ok_or(ConfigError::Missing("COGNITO_USER_POOL_ID"))?;

    Ok(format!(
        "https://cognito-idp.{}.amazonaws.com/{}",
        region.trim(),
        pool_id.trim()
    ))
}

fn verifier_config(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<JwtVerifierConfig, ConfigError> {
    let jwks = match (lookup("ID_TOKEN_JWKS"), lookup("ID_TOKEN_JWKS_PATH")) {
        (Some(inline), _) => {
            serde_json::from_str::<JwkSet>(&inline).map_err(|_| ConfigError::Invalid("ID_TOKEN_JWKS"))?
        }
        (None, Some(path)) => {
            let raw = std::fs::read_to_string(&path)
                .map_err(|_| ConfigError::Invalid("ID_TOKEN_JWKS_PATH"))?;
            serde_json::from_str::<JwkSet>(&raw)
                .map_err(|_| ConfigError::Invalid("ID_TOKEN_JWKS_PATH"))?
        }
        (None, None) => return Err(ConfigError::Missing("ID_TOKEN_JWKS")),
    };

    let algorithms = lookup("ID_TOKEN_ALGORITHMS")
        .unwrap_or_else(|| "RS256".to_string())
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Algorithm::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConfigError::Invalid("ID_TOKEN_ALGORITHMS"))?;

    if algorithms.is_empty() {
        return Err(ConfigError::Invalid("ID_TOKEN_ALGORITHMS"));
    }

    let audience = lookup("ID_TOKEN_AUDIENCE")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let leeway_seconds = match lookup("ID_TOKEN_LEEWAY_SECONDS") {
        Some(s) => s
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid("ID_TOKEN_LEEWAY_SECONDS"))?,
        None => 60,
    };

    Ok(JwtVerifierConfig {
        jwks,
        algorithms,
        audience,
        leeway_seconds,
    })
}

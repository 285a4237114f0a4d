use async_trait::async_trait;
use jsonwebtoken::{
    Algorithm, DecodingKey, Validation, decode, decode_header, errors::ErrorKind, jwk::JwkSet,
};
use serde_json::Value;

use crate::config::JwtVerifierConfig;
use crate::services::auth::claims::ClaimSet;
use crate::services::auth::verifier::{ClaimsVerifier, VerifierError};

/// Key-set backed JWT verifier.
///
/// Checks algorithm allow-list, `kid`, signature, `exp`/`nbf` (with leeway)
/// and `aud` when an audience is configured. The issuer is left to the
/// identity resolver so that a foreign issuer is reported as such.
#[derive(Clone)]
pub struct JwtClaimsVerifier {
    jwks: JwkSet,
    algorithms: Vec<Algorithm>,
    audience: Option<String>,
    leeway_seconds: u64,
}

impl std::fmt::Debug for JwtClaimsVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtClaimsVerifier")
            .field("keys", &self.jwks.keys.len())
            .field("algorithms", &self.algorithms)
            .field("audience", &self.audience)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl JwtClaimsVerifier {
    pub fn new(config: &JwtVerifierConfig) -> Self {
        Self {
            jwks: config.jwks.clone(),
            algorithms: config.algorithms.clone(),
            audience: config.audience.clone(),
            leeway_seconds: config.leeway_seconds,
        }
    }

    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.leeway = self.leeway_seconds;
        validation.validate_nbf = true;

        match &self.audience {
            Some(aud) => validation.set_audience(&[aud]),
            // ID tokens always carry `aud`; without an expected value it must not be checked.
            None => validation.validate_aud = false,
        }

        validation
    }

    pub fn verify(&self, token: &str) -> Result<ClaimSet, VerifierError> {
        let header = decode_header(token).map_err(|e| VerifierError::Malformed(e.to_string()))?;

        if !self.algorithms.contains(&header.alg) {
            return Err(VerifierError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }

        let kid = header.kid.ok_or(VerifierError::MissingKeyId)?;
        let jwk = self
            .jwks
            .find(&kid)
            .ok_or_else(|| VerifierError::UnknownKey(kid.clone()))?;
        let key = DecodingKey::from_jwk(jwk).map_err(|e| VerifierError::InvalidKey {
            kid: kid.clone(),
            reason: e.to_string(),
        })?;

        let data = decode::<Value>(token, &key, &self.validation(header.alg))
            .map_err(from_jwt_error)?;

        Ok(ClaimSet::try_from(data.claims)?)
    }
}

#[async_trait]
impl ClaimsVerifier for JwtClaimsVerifier {
    async fn process(&self, token: &str) -> Result<ClaimSet, VerifierError> {
        self.verify(token)
    }
}

fn from_jwt_error(e: jsonwebtoken::errors::Error) -> VerifierError {
    match e.kind() {
        ErrorKind::ExpiredSignature => VerifierError::Expired,
        ErrorKind::InvalidSignature => VerifierError::InvalidSignature,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            VerifierError::Malformed(e.to_string())
        }
        _ => VerifierError::Rejected(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use serde_json::json;

    use super::*;

    fn verifier(algorithms: Vec<Algorithm>) -> JwtClaimsVerifier {
        let jwks: JwkSet = serde_json::from_value(json!({
            "keys": [{
                "kty": "OKP",
                "crv": "Ed25519",
                "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo",
                "kid": "k1",
                "alg": "EdDSA",
                "use": "sig"
            }]
        }))
        .unwrap();

        JwtClaimsVerifier::new(&JwtVerifierConfig {
            jwks,
            algorithms,
            audience: None,
            leeway_seconds: 0,
        })
    }

    // Unsigned `{header}.{payload}.` for checks that happen before signature verification.
    fn raw_jwt(header: Value, payload: Value) -> String {
        let h = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap());
        let p = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());
        format!("{h}.{p}.")
    }

    #[test]
    fn garbage_is_malformed() {
        let err = verifier(vec![Algorithm::EdDSA]).verify("not-a-jwt").unwrap_err();
        assert!(matches!(err, VerifierError::Malformed(_)), "{err:?}");
    }

    #[test]
    fn algorithm_outside_allow_list_is_rejected() {
        let token = raw_jwt(json!({"alg": "HS256", "kid": "k1"}), json!({"sub": "x"}));
        let err = verifier(vec![Algorithm::EdDSA]).verify(&token).unwrap_err();
        assert!(matches!(err, VerifierError::UnsupportedAlgorithm(_)), "{err:?}");
    }

    #[test]
    fn alg_none_is_rejected() {
        let token = raw_jwt(json!({"alg": "none", "kid": "k1"}), json!({"sub": "x"}));
        let err = verifier(vec![Algorithm::EdDSA]).verify(&token).unwrap_err();
        assert!(matches!(err, VerifierError::Malformed(_)), "{err:?}");
    }

    #[test]
    fn missing_kid_is_rejected() {
        let token = raw_jwt(json!({"alg": "EdDSA"}), json!({"sub": "x"}));
        let err = verifier(vec![Algorithm::EdDSA]).verify(&token).unwrap_err();
        assert!(matches!(err, VerifierError::MissingKeyId), "{err:?}");
    }

    #[test]
    fn unknown_kid_is_rejected() {
        let token = raw_jwt(json!({"alg": "EdDSA", "kid": "other"}), json!({"sub": "x"}));
        let err = verifier(vec![Algorithm::EdDSA]).verify(&token).unwrap_err();
        assert!(matches!(err, VerifierError::UnknownKey(ref kid) if kid == "other"), "{err:?}");
    }

    #[test]
    fn debug_does_not_print_keys() {
        let out = format!("{:?}", verifier(vec![Algorithm::EdDSA]));
        assert!(!out.contains("11qYAYKx"));
        assert!(out.contains("keys: 1"));
    }
}

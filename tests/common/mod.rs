//! Shared helpers: a deterministic Ed25519 key, its JWKS, and signed ID tokens.

#![allow(dead_code)]

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use ed25519_dalek::SigningKey;
use id_token_gateway::config::{IdTokenConfig, JwtVerifierConfig};
use jsonwebtoken::{Algorithm, EncodingKey, Header, jwk::JwkSet};
use serde_json::{Value, json};

pub const ISSUER: &str = "https://cognito-idp.eu-central-1.amazonaws.com/eu-central-1_TestPool";
pub const KID: &str = "test-key-1";

pub struct TestKey {
    seed: [u8; 32],
    pub kid: String,
}

impl TestKey {
    pub fn new(seed_byte: u8, kid: &str) -> Self {
        Self {
            seed: [seed_byte; 32],
            kid: kid.to_string(),
        }
    }

    pub fn primary() -> Self {
        Self::new(7, KID)
    }

    fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.seed)
    }

    /// PKCS#8 v1 DER wrapping the raw seed (what `EncodingKey::from_ed_der` expects).
    fn pkcs8_der(&self) -> Vec<u8> {
        let mut der = vec![
            0x30, 0x2e, // SEQUENCE, 46 bytes
            0x02, 0x01, 0x00, // INTEGER version 0
            0x30, 0x05, // SEQUENCE, algorithm identifier
            0x06, 0x03, 0x2b, 0x65, 0x70, // OID 1.3.101.112 (Ed25519)
            0x04, 0x22, // OCTET STRING, 34 bytes
            0x04, 0x20, // OCTET STRING, 32 bytes
        ];
        der.extend_from_slice(&self.seed);
        der
    }

    pub fn jwk(&self) -> Value {
        let x = URL_SAFE_NO_PAD.encode(self.signing_key().verifying_key().to_bytes());
        json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "x": x,
            "kid": self.kid,
            "alg": "EdDSA",
            "use": "sig"
        })
    }

    pub fn sign(&self, claims: &Value) -> String {
        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some(self.kid.clone());

        let key = EncodingKey::from_ed_der(&self.pkcs8_der());
        jsonwebtoken::encode(&header, claims, &key).expect("encode test jwt")
    }
}

pub fn jwks(keys: &[&TestKey]) -> JwkSet {
    let keys: Vec<Value> = keys.iter().map(|k| k.jwk()).collect();
    serde_json::from_value(json!({ "keys": keys })).expect("jwks")
}

pub fn verifier_config() -> JwtVerifierConfig {
    JwtVerifierConfig {
        jwks: jwks(&[&TestKey::primary()]),
        algorithms: vec![Algorithm::EdDSA],
        audience: None,
        leeway_seconds: 0,
    }
}

pub fn id_token_config() -> IdTokenConfig {
    IdTokenConfig::new(ISSUER)
}

pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Claims of a valid Cognito-style ID token for `alice`.
pub fn id_claims() -> Value {
    let now = now();
    json!({
        "iss": ISSUER,
        "sub": "6f1c0d2e-1111-4a2b-9c3d-000000000001",
        "aud": "test-client-id",
        "token_use": "id",
        "cognito:username": "alice",
        "cognito:groups": ["admins", "readers"],
        "iat": now,
        "exp": now + 3600
    })
}

pub fn with(mut claims: Value, key: &str, value: Value) -> Value {
    claims[key] = value;
    claims
}

pub fn without(mut claims: Value, key: &str) -> Value {
    if let Some(map) = claims.as_object_mut() {
        map.remove(key);
    }
    claims
}

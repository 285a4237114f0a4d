/// Factory: build the `IdentityResolver` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{IdentityResolver, JwtClaimsVerifier};

pub fn build_identity_resolver(config: &Config) -> Arc<IdentityResolver> {
    let verifier = JwtClaimsVerifier::new(&config.verifier);

    tracing::info!(
        issuer = %config.id_token.issuer,
        header = %config.id_token.http_header,
        keys = config.verifier.jwks.keys.len(),
        algorithms = ?config.verifier.algorithms,
        "id token verification configured"
    );

    Arc::new(IdentityResolver::new(
        Arc::new(config.id_token.clone()),
        Arc::new(verifier),
    ))
}

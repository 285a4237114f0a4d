//! ID token authentication → AuthCtx / IdTokenCredentials in request extensions
//!
//! - A fresh `IdTokenCredentials` slot is created for every request and always
//!   inserted, so downstream code can look it up even when unauthenticated.
//! - No header (or a token without username) lets the request through without
//!   an `AuthCtx`; handlers that need one reject via `AuthCtxExtractor`.
//! - A presented but unacceptable token is rejected here with 401.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{IdTokenCredentials, resolver::token_fingerprint, strip_bearer_prefix};
use crate::state::AppState;

/// Apply ID token authentication to every route of `router`.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::id_token::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 from_fn cannot take the State extractor; pass state explicitly
    router.layer(middleware::from_fn_with_state(state, id_token_middleware))
}

async fn id_token_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credentials = IdTokenCredentials::new();

    let header_name = &state.auth.config().http_header;
    let header_value = match req.headers().get(header_name) {
        // A present but unreadable value is still a credential; the verifier rejects it.
        Some(v) => Some(match v.to_str() {
            Ok(s) => s.to_owned(),
            Err(_) => {
                tracing::debug!(header = %header_name, "non-ascii id token header");
                String::from_utf8_lossy(v.as_bytes()).into_owned()
            }
        }),
        None => None,
    };

    match state
        .auth
        .authenticate(header_value.as_deref(), &credentials)
        .await
    {
        Ok(Some(identity)) => {
            req.extensions_mut()
                .insert(AuthCtx::new(identity, credentials.clone()));
        }
        Ok(None) => {}
        Err(err) => {
            let fingerprint = header_value
                .as_deref()
                .map(|raw| token_fingerprint(strip_bearer_prefix(raw)))
                .unwrap_or_default();
            tracing::warn!(
                error = %err,
                code = err.code(),
                %fingerprint,
                "id token rejected"
            );
            return Err(err.into());
        }
    }

    req.extensions_mut().insert(credentials);

    Ok(next.run(req).await)
}

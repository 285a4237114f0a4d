/*
 * Responsibility
 * - GET /me: who the ID token says the caller is
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::AuthCtxExtractor};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    tracing::debug!(
        username = %ctx.username(),
        forwardable = ctx.credentials.is_set(),
        "me"
    );

    Json(MeResponse {
        username: ctx.identity.username,
        roles: ctx.identity.roles,
    })
}

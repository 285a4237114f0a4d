/*
 * Responsibility
 * - v1 URL structure
 * - every v1 route sits behind the id_token middleware (applied in app.rs)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::me::me;

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Cheap to clone (everything behind Arc)
 */
use std::sync::Arc;

use crate::services::auth::IdentityResolver;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<IdentityResolver>,
}

impl AppState {
    pub fn new(auth: Arc<IdentityResolver>) -> Self {
        Self { auth }
    }
}

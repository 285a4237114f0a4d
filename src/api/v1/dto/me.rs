use serde::Serialize;

use crate::services::auth::Role;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub roles: Vec<Role>,
}

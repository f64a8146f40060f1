//! Optional user filter shared by read endpoints

use serde::Deserialize;

use super::{UserId, ValidationError};

/// Query string carrying an optional `user_id` (`GET /photos`, `GET /stats`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

impl UserQuery {
    /// The requested user; a blank value means "no user".
    pub fn user(&self) -> Result<Option<UserId>, ValidationError> {
        match self.user_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => UserId::parse(raw, "user_id").map(Some),
        }
    }
}

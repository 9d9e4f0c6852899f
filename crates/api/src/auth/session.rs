//! The record a successful login leaves in the session store.

use personagens_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Session key under which [`SessionAuth`] is stored.
pub const SESSION_AUTH_KEY: &str = "auth";

/// Who the session belongs to, and whether it passed login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAuth {
    pub user_id: DbId,
    pub authenticated: bool,
}

impl SessionAuth {
    pub fn logged_in(user_id: DbId) -> Self {
        Self {
            user_id,
            authenticated: true,
        }
    }
}

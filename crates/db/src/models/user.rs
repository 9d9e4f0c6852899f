//! User entity model and DTOs.

use personagens_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `usuarios` table.
///
/// Contains the password hash, so it deliberately has no `Serialize` impl.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    #[sqlx(rename = "nome")]
    pub name: String,
    pub email: String,
    /// PHC-formatted Argon2id hash.
    #[sqlx(rename = "senha")]
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

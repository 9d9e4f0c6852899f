//! Repository seams and their PostgreSQL implementation.
//!
//! Every statement binds its values through positional placeholders
//! (`$1`, `$2`, ...); no value is ever formatted into SQL text.

use async_trait::async_trait;
use personagens_core::types::DbId;

use crate::error::StoreError;
use crate::models::character::{Character, CreateCharacter, UpdateCharacter};
use crate::models::user::{CreateUser, User};
use crate::DbPool;

mod character_repo;
mod user_repo;

/// Persistence operations on users.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a new user, returning the created row.
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    /// Find a user by email (case-sensitive).
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Replace the password hash of the user with `email`.
    ///
    /// Returns `false` when no user has that email.
    async fn update_password_by_email(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, StoreError>;
}

/// Persistence operations on characters.
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    /// Insert a new character, returning the created row.
    async fn create_character(&self, input: &CreateCharacter) -> Result<Character, StoreError>;

    /// List all characters in natural id order.
    async fn list_characters(&self) -> Result<Vec<Character>, StoreError>;

    /// Find a character by id.
    async fn find_character(&self, id: DbId) -> Result<Option<Character>, StoreError>;

    /// Apply the `Some` fields of `input`. Returns `None` if no row has `id`.
    async fn update_character(
        &self,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, StoreError>;

    /// Delete a character. Returns `true` if a row was removed.
    async fn delete_character(&self, id: DbId) -> Result<bool, StoreError>;
}

/// Everything the HTTP layer needs from persistence.
#[async_trait]
pub trait Store: UserRepo + CharacterRepo {
    /// Cheap reachability probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// [`Store`] backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

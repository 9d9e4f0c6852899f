//! Repository for the `usuarios` table.

use async_trait::async_trait;

use super::{PgStore, UserRepo};
use crate::error::StoreError;
use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, nome, email, senha, created_at";

#[async_trait]
impl UserRepo for PgStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO usuarios (nome, email, senha)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(self.pool())
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM usuarios WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn update_password_by_email(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE usuarios SET senha = $1 WHERE email = $2")
            .bind(password_hash)
            .bind(email)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

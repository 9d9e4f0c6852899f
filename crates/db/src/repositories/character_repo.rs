//! Repository for the `personagens` table.

use async_trait::async_trait;
use personagens_core::types::DbId;

use super::{CharacterRepo, PgStore};
use crate::error::StoreError;
use crate::models::character::{Character, CreateCharacter, UpdateCharacter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, nome, descricao, foto, created_at, updated_at";

#[async_trait]
impl CharacterRepo for PgStore {
    async fn create_character(&self, input: &CreateCharacter) -> Result<Character, StoreError> {
        let query = format!(
            "INSERT INTO personagens (nome, descricao, foto)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.photo)
            .fetch_one(self.pool())
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn list_characters(&self) -> Result<Vec<Character>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM personagens ORDER BY id ASC");
        let characters = sqlx::query_as::<_, Character>(&query)
            .fetch_all(self.pool())
            .await?;
        Ok(characters)
    }

    async fn find_character(&self, id: DbId) -> Result<Option<Character>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM personagens WHERE id = $1");
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(character)
    }

    /// `None` fields bind as SQL NULL and `COALESCE` keeps the stored value.
    async fn update_character(
        &self,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, StoreError> {
        let query = format!(
            "UPDATE personagens SET
                nome = COALESCE($2, nome),
                descricao = COALESCE($3, descricao),
                foto = COALESCE($4, foto),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.photo)
            .fetch_optional(self.pool())
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn delete_character(&self, id: DbId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM personagens WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

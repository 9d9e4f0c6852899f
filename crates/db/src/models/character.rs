//! Character entity model and DTOs.

use personagens_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A character row from the `personagens` table.
///
/// Serialized with the table's column names, which are also the names of the
/// form fields clients send.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    #[sqlx(rename = "nome")]
    #[serde(rename = "nome")]
    pub name: String,
    #[sqlx(rename = "descricao")]
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    /// Stored filename inside the upload directory.
    #[sqlx(rename = "foto")]
    #[serde(rename = "foto")]
    pub photo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new character. A photo is mandatory at creation.
#[derive(Debug, Clone)]
pub struct CreateCharacter {
    pub name: String,
    pub description: Option<String>,
    pub photo: String,
}

/// DTO for updating an existing character. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateCharacter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
}

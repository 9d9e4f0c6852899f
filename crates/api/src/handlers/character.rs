//! Handlers for the `/api/personagens` resource.
//!
//! Create and update receive their photo through the upload extractors in
//! [`crate::upload`]; if the row write does not happen, the freshly stored
//! file is removed again.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use personagens_core::character::{validate_create, validate_update};
use personagens_core::error::CoreError;
use personagens_core::types::DbId;
use personagens_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use personagens_db::CharacterRepo;

use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;
use crate::upload::{CharacterForm, NewCharacterForm};

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound(format!("Character {id} not found")))
}

/// POST /api/personagens
pub async fn create(
    State(state): State<AppState>,
    form: NewCharacterForm,
) -> AppResult<(StatusCode, Json<Character>)> {
    let NewCharacterForm {
        name,
        description,
        photo,
    } = form;

    if let Err(e) = validate_create(name.as_deref()) {
        state.uploads.remove(&photo).await;
        return Err(e.into());
    }

    let input = CreateCharacter {
        name: name.unwrap_or_default(),
        description,
        photo,
    };
    match state.store.create_character(&input).await {
        Ok(character) => {
            tracing::info!(character_id = character.id, "Character created");
            Ok((StatusCode::CREATED, Json(character)))
        }
        Err(e) => {
            state.uploads.remove(&input.photo).await;
            Err(e.into())
        }
    }
}

/// GET /api/personagens
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Character>>> {
    let characters = state.store.list_characters().await?;
    Ok(Json(characters))
}

/// GET /api/personagens/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Character>> {
    let character = state
        .store
        .find_character(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(character))
}

/// PUT /api/personagens/{id}
///
/// Only supplied fields change. An update with nothing supplied is a 400.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    form: CharacterForm,
) -> AppResult<Json<Character>> {
    let input = UpdateCharacter {
        name: form.name,
        description: form.description,
        photo: form.photo,
    };
    validate_update(
        input.name.as_deref(),
        input.description.as_deref(),
        input.photo.is_some(),
    )?;

    let result = state.store.update_character(id, &input).await;
    match result {
        Ok(Some(character)) => {
            tracing::info!(
                character_id = id,
                photo_changed = input.photo.is_some(),
                "Character updated"
            );
            Ok(Json(character))
        }
        Ok(None) => {
            discard_photo(&state, &input).await;
            Err(not_found(id))
        }
        Err(e) => {
            discard_photo(&state, &input).await;
            Err(e.into())
        }
    }
}

/// DELETE /api/personagens/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !state.store.delete_character(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(character_id = id, "Character deleted");
    Ok(Json(MessageResponse::new("Character deleted successfully")))
}

async fn discard_photo(state: &AppState, input: &UpdateCharacter) {
    if let Some(photo) = &input.photo {
        state.uploads.remove(photo).await;
    }
}

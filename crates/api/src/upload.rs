//! Photo uploads for the character routes.
//!
//! [`CharacterForm`] and [`NewCharacterForm`] are extractors that read the
//! multipart body (`nome`, `descricao`, and the `foto` file), write the photo
//! into the upload directory, and hand the stored filename to the handler.
//! A rejected extraction never reaches the handler.

use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use chrono::Utc;
use personagens_core::character::{supplied, FIELD_DESCRIPTION, FIELD_NAME, FIELD_PHOTO};
use personagens_core::upload::{is_stored_name, stored_file_name};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Length of the random token inside stored filenames.
const TOKEN_LEN: usize = 8;

/// Local directory holding uploaded photos.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `data` under a freshly generated name and return that name.
    ///
    /// Never overwrites: the file is opened with `create_new`.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let token = Uuid::new_v4().simple().to_string();
        let name = stored_file_name(
            original_name,
            Utc::now().timestamp_millis(),
            &token[..TOKEN_LEN],
        );

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.dir.join(&name))
            .await?;
        file.write_all(data).await?;
        file.flush().await?;

        tracing::debug!(file = %name, bytes = data.len(), "Stored upload");
        Ok(name)
    }

    /// Best-effort removal of a stored upload. Failures are only logged.
    pub async fn remove(&self, name: &str) {
        if !is_stored_name(name) {
            tracing::warn!(file = %name, "Refusing to remove unexpected upload name");
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.dir.join(name)).await {
            tracing::warn!(file = %name, error = %e, "Failed to remove upload");
        }
    }
}

/// A file part read from the request but not yet written anywhere.
struct PendingFile {
    file_name: String,
    data: Bytes,
}

/// The raw fields of a character form.
struct RawForm {
    name: Option<String>,
    description: Option<String>,
    photo: Option<PendingFile>,
}

async fn read_form(req: Request, state: &AppState) -> AppResult<RawForm> {
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| AppError::rejected(e.status(), e.body_text()))?;

    let mut form = RawForm {
        name: None,
        description: None,
        photo: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::rejected(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            FIELD_NAME | FIELD_DESCRIPTION => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
                if name == FIELD_NAME {
                    form.name = supplied(Some(text));
                } else {
                    form.description = supplied(Some(text));
                }
            }
            FIELD_PHOTO => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
                // An empty file input still submits a zero-length part.
                if data.is_empty() {
                    continue;
                }
                if form.photo.is_some() {
                    return Err(AppError::BadRequest(format!(
                        "Only one '{FIELD_PHOTO}' file is accepted"
                    )));
                }
                form.photo = Some(PendingFile { file_name, data });
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}

async fn store_photo(state: &AppState, file: PendingFile) -> AppResult<String> {
    state
        .uploads
        .save(&file.file_name, &file.data)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to store upload");
            AppError::InternalError("Failed to store uploaded file".into())
        })
}

/// Character form where every field is optional (update).
///
/// `photo` holds the stored filename when a `foto` file was sent.
#[derive(Debug)]
pub struct CharacterForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
}

impl FromRequest<AppState> for CharacterForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let form = read_form(req, state).await?;
        let photo = match form.photo {
            Some(file) => Some(store_photo(state, file).await?),
            None => None,
        };
        Ok(CharacterForm {
            name: form.name,
            description: form.description,
            photo,
        })
    }
}

/// Character form that must carry a `foto` file (create).
#[derive(Debug)]
pub struct NewCharacterForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub photo: String,
}

impl FromRequest<AppState> for NewCharacterForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let form = read_form(req, state).await?;
        let file = form.photo.ok_or_else(|| {
            AppError::BadRequest(format!("Missing required '{FIELD_PHOTO}' file"))
        })?;
        let photo = store_photo(state, file).await?;
        Ok(NewCharacterForm {
            name: form.name,
            description: form.description,
            photo,
        })
    }
}

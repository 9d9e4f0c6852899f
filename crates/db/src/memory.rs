//! In-memory [`Store`] used by tests and local experiments.
//!
//! Mirrors the PostgreSQL schema rules that callers can observe: ids are
//! assigned sequentially, emails are unique, listing follows id order, and an
//! update only touches the fields it was given.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use personagens_core::types::DbId;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::character::{Character, CreateCharacter, UpdateCharacter};
use crate::models::user::{CreateUser, User};
use crate::repositories::{CharacterRepo, Store, UserRepo};

/// Name reported for duplicate emails, matching the SQL constraint.
const EMAIL_CONSTRAINT: &str = "uq_usuarios_email";

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<DbId, User>,
    characters: BTreeMap<DbId, Character>,
    next_user_id: DbId,
    next_character_id: DbId,
}

/// Process-local store. Cloning is not supported; share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;

        if tables.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::UniqueViolation(EMAIL_CONSTRAINT.into()));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_password_by_email(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        match tables.users.values_mut().find(|u| u.email == email) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CharacterRepo for MemoryStore {
    async fn create_character(&self, input: &CreateCharacter) -> Result<Character, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;

        tables.next_character_id += 1;
        let now = Utc::now();
        let character = Character {
            id: tables.next_character_id,
            name: input.name.clone(),
            description: input.description.clone(),
            photo: Some(input.photo.clone()),
            created_at: now,
            updated_at: now,
        };
        tables.characters.insert(character.id, character.clone());
        Ok(character)
    }

    async fn list_characters(&self) -> Result<Vec<Character>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables.characters.values().cloned().collect())
    }

    async fn find_character(&self, id: DbId) -> Result<Option<Character>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables.characters.get(&id).cloned())
    }

    async fn update_character(
        &self,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        let Some(character) = tables.characters.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = &input.name {
            character.name = name.clone();
        }
        if let Some(description) = &input.description {
            character.description = Some(description.clone());
        }
        if let Some(photo) = &input.photo {
            character.photo = Some(photo.clone());
        }
        character.updated_at = Utc::now();
        Ok(Some(character.clone()))
    }

    async fn delete_character(&self, id: DbId) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        Ok(tables.characters.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }
}

//! Handlers for the `/auth` resource (register, login, forgot-password).
//!
//! Failures of the store or the password hasher are logged with full detail
//! and reported to the client as a short generic 500.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use personagens_core::error::CoreError;
use personagens_db::models::user::CreateUser;
use personagens_db::UserRepo;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use validator::Validate;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::session::{SessionAuth, SESSION_AUTH_KEY};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "nome", alias = "name")]
    #[validate(length(min = 1, message = "nome must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(rename = "senha")]
    #[validate(length(min = 1, message = "senha must not be empty"))]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: String,
    #[serde(rename = "senha")]
    #[validate(length(min = 1, message = "senha must not be empty"))]
    pub password: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(rename = "novaSenha")]
    #[validate(length(min = 1, message = "novaSenha must not be empty"))]
    pub new_password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub auth: bool,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Any store failure, a duplicate email included, is reported as a plain 500.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let password_hash = hash_password_blocking(input.password)
        .await
        .map_err(|e| internal("Failed to register user", &e))?;

    let user = state
        .store
        .create_user(&CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
        })
        .await
        .map_err(|e| internal("Failed to register user", &e))?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /auth/login
///
/// Stores a [`SessionAuth`] in the session on success.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    const FAILURE: &str = "Failed to authenticate user";

    // 1. Find user by email.
    let user = state
        .store
        .find_user_by_email(&input.email)
        .await
        .map_err(|e| internal(FAILURE, &e))?
        .ok_or_else(|| CoreError::Unauthorized("User not found".into()))?;

    // 2. Verify password.
    let password_valid = verify_password_blocking(input.password, user.password_hash)
        .await
        .map_err(|e| internal(FAILURE, &e))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(CoreError::Unauthorized("Wrong password".into()).into());
    }

    // 3. Remember the user in the session.
    session
        .insert(SESSION_AUTH_KEY, SessionAuth::logged_in(user.id))
        .await
        .map_err(|e| internal(FAILURE, &e))?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        auth: true,
        message: "Login successful",
    }))
}

/// POST /auth/forgot-password
///
/// Knowing the email is enough to replace the password; there is no
/// ownership proof in this flow.
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    const FAILURE: &str = "Failed to update password";

    let password_hash = hash_password_blocking(input.new_password)
        .await
        .map_err(|e| internal(FAILURE, &e))?;

    let updated = state
        .store
        .update_password_by_email(&input.email, &password_hash)
        .await
        .map_err(|e| internal(FAILURE, &e))?;
    if !updated {
        return Err(CoreError::NotFound("User not found".into()).into());
    }

    tracing::info!("Password reset");
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Log the underlying error and replace it with a detail-free message.
fn internal(message: &str, err: &dyn std::fmt::Display) -> AppError {
    tracing::error!(error = %err, "{message}");
    AppError::Core(CoreError::Internal(message.to_string()))
}

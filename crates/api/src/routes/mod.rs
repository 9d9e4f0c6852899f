pub mod auth;
pub mod character;
pub mod health;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the application routes (everything except health and static files).
///
/// ```text
/// /auth             -> register, login, forgot-password
/// /api/personagens  -> character CRUD
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest(
            "/api/personagens",
            character::router(config.require_session_for_writes),
        )
}
